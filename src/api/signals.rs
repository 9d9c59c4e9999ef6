//! Signal API endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::types::{Instrument, SymbolView};
use crate::AppState;

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// Unix timestamp (milliseconds) of the response.
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            meta: ApiMeta {
                timestamp: Utc::now().timestamp_millis(),
            },
        }
    }
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_signals))
        .route("/:symbol", get(get_signal))
        .route("/:symbol/refresh", post(refresh_signal))
}

fn find_instrument<'a>(state: &'a AppState, symbol: &str) -> Result<&'a Instrument> {
    state
        .service
        .instruments()
        .iter()
        .find(|i| i.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| AppError::NotFound(format!("Unknown symbol: {}", symbol)))
}

/// Placeholder for a watched symbol that has not been refreshed yet.
fn pending(instrument: &Instrument) -> SymbolView {
    SymbolView::Unavailable {
        instrument: instrument.clone(),
        reason: "Awaiting first refresh".to_string(),
        updated_at: 0,
    }
}

/// Latest view for every watched instrument, in watchlist order.
async fn list_signals(State(state): State<AppState>) -> Json<ApiResponse<Vec<SymbolView>>> {
    let views = state
        .service
        .instruments()
        .iter()
        .map(|i| state.service.view(&i.symbol).unwrap_or_else(|| pending(i)))
        .collect();

    Json(ApiResponse::new(views))
}

/// Latest view for one symbol.
async fn get_signal(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<SymbolView>>> {
    let instrument = find_instrument(&state, &symbol)?;
    let view = state
        .service
        .view(&instrument.symbol)
        .unwrap_or_else(|| pending(instrument));

    Ok(Json(ApiResponse::new(view)))
}

/// Refresh one symbol now and return the new view.
async fn refresh_signal(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<SymbolView>>> {
    let instrument = find_instrument(&state, &symbol)?.clone();
    let view = state
        .service
        .refresh_instrument(&instrument, Utc::now())
        .await;

    Ok(Json(ApiResponse::new(view)))
}
