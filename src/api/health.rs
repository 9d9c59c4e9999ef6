use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    instruments: usize,
    ready: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = state
        .service
        .board()
        .iter()
        .filter(|v| v.report().is_some())
        .count();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        instruments: state.service.instruments().len(),
        ready,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
