use axum::Router;
use sniper::api;
use sniper::config::Config;
use sniper::services::{Scheduler, SignalEngine, SignalService};
use sniper::sources::YahooFinanceClient;
use sniper::tui::run_tui;
use sniper::AppState;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Console logging for the server; file logging while the dashboard owns the terminal.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sniper=info,tower_http=info".into());

    let (console, file) = if config.tui {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(log_file));
        (None, Some(layer))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(Config::from_env());
    init_tracing(&config)?;
    info!(
        instruments = config.instruments.len(),
        interval = config.bar_interval_minutes,
        timezone = %config.display_tz,
        "Starting Sniper on {}:{}",
        config.host,
        config.port
    );

    let service = SignalService::new(
        Arc::new(YahooFinanceClient::new()),
        SignalEngine::new(config.engine_config()),
        config.instruments.clone(),
        config.refresh_settings(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (scheduler, handle) = Scheduler::new(service.clone(), shutdown_rx.clone());
    let scheduler_task = tokio::spawn(scheduler.run());

    let state = AppState {
        config: config.clone(),
        service,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state.clone());

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Sniper API listening on {}", addr);

    if config.tui {
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
                .await
        });

        let result = run_tui(Arc::new(state), handle).await;
        shutdown_tx.send(true).ok();

        match server.await {
            Ok(Err(e)) => error!("Server error: {}", e),
            Err(e) => error!("Server task failed: {}", e),
            Ok(Ok(())) => {}
        }
        result?;
    } else {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
                info!("Shutdown requested");
            })
            .await?;
        shutdown_tx.send(true).ok();
    }

    scheduler_task.await.ok();
    info!("Sniper stopped");

    Ok(())
}
