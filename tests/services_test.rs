//! Integration tests for the signal service, cache and scheduler

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sniper::error::EngineError;
use sniper::services::{
    Command, RefreshSettings, Scheduler, SeriesCache, SignalEngine, SignalService, View,
};
use sniper::sources::{BarRequest, MarketDataProvider};
use sniper::types::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// In-memory provider with canned responses and a request log.
struct ScriptedProvider {
    responses: Mutex<HashMap<String, Result<RawSeries, EngineError>>>,
    requests: Mutex<Vec<BarRequest>>,
}

impl ScriptedProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn respond(&self, symbol: &str, response: Result<RawSeries, EngineError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(symbol.to_string(), response);
    }

    fn calls_for(&self, symbol: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.symbol == symbol)
            .count()
    }
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_bars(&self, request: &BarRequest) -> Result<RawSeries, EngineError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&request.symbol)
            .cloned()
            .unwrap_or_else(|| Ok(RawSeries::new(request.symbol.clone(), Vec::new())))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 6, 12, 5, 0).unwrap()
}

fn bars(symbol: &str, count: usize, base: f64) -> RawSeries {
    let end = Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap();
    let bars = (0..count)
        .map(|i| {
            let close = base + (i as f64 * 0.15).sin() * base * 0.01;
            RawBar {
                timestamp: RawTimestamp::Aware(
                    (end - Duration::minutes(15 * (count - 1 - i) as i64)).fixed_offset(),
                ),
                open: close,
                high: close * 1.001,
                low: close * 0.999,
                close,
                volume: 5.0,
            }
        })
        .collect();
    RawSeries::new(symbol, bars)
}

fn settings() -> RefreshSettings {
    RefreshSettings {
        cache_ttl: std::time::Duration::from_secs(60),
        overview_every: std::time::Duration::from_secs(3600),
        focus_every: std::time::Duration::from_secs(3600),
        ..RefreshSettings::default()
    }
}

fn service(provider: Arc<ScriptedProvider>) -> Arc<SignalService> {
    SignalService::new(
        provider,
        SignalEngine::default(),
        Instrument::default_watchlist(),
        settings(),
    )
}

#[tokio::test]
async fn test_empty_response_leaves_other_symbols_unaffected() {
    let provider = ScriptedProvider::new();
    for (symbol, base) in [
        ("EURUSD=X", 1.08),
        ("GBPUSD=X", 1.27),
        ("JPY=X", 150.0),
        ("GC=F", 2150.0),
        ("BTC-USD", 67000.0),
        ("ES=F", 5100.0),
    ] {
        provider.respond(symbol, Ok(bars(symbol, 200, base)));
    }
    provider.respond("GC=F", Ok(RawSeries::new("GC=F", Vec::new())));

    let svc = service(provider.clone());
    assert_eq!(svc.refresh_all(now()).await, 5);

    let board = svc.board();
    assert_eq!(board.len(), 6);
    for view in &board {
        let expect_ready = view.instrument().symbol != "GC=F";
        assert_eq!(view.report().is_some(), expect_ready, "{}", view.instrument().symbol);
    }
}

#[tokio::test]
async fn test_next_cycle_retries_after_failure() {
    let provider = ScriptedProvider::new();
    provider.respond("ES=F", Err(EngineError::FetchFailure("503".into())));
    let svc = service(provider.clone());

    let first = svc.refresh_symbol("ES=F", now()).await.unwrap();
    assert!(first.report().is_none());

    provider.respond("ES=F", Ok(bars("ES=F", 200, 5100.0)));
    let second = svc.refresh_symbol("ES=F", now()).await.unwrap();
    assert!(second.report().is_some());
    assert_eq!(provider.calls_for("ES=F"), 2);
}

#[tokio::test]
async fn test_requests_carry_configured_window() {
    let provider = ScriptedProvider::new();
    let svc = service(provider.clone());
    svc.refresh_symbol("JPY=X", now()).await;

    let requests = provider.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].lookback, Duration::days(5));
    assert_eq!(requests[0].interval_minutes, 15);
}

#[tokio::test]
async fn test_concurrent_refreshes_share_one_fetch() {
    let provider = ScriptedProvider::new();
    provider.respond("BTC-USD", Ok(bars("BTC-USD", 200, 67000.0)));
    let svc = service(provider.clone());

    let (a, b, c) = tokio::join!(
        svc.refresh_symbol("BTC-USD", now()),
        svc.refresh_symbol("BTC-USD", now()),
        svc.refresh_all(now()),
    );
    assert!(a.unwrap().report().is_some());
    assert!(b.unwrap().report().is_some());
    assert_eq!(c, 1);
    assert_eq!(provider.calls_for("BTC-USD"), 1);
}

#[tokio::test]
async fn test_scheduler_navigate_then_shutdown() {
    let provider = ScriptedProvider::new();
    provider.respond("GC=F", Ok(bars("GC=F", 200, 2150.0)));
    let svc = service(provider.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (scheduler, handle) = Scheduler::new(svc.clone(), shutdown_rx);
    let task = tokio::spawn(scheduler.run());

    assert!(handle.send(Command::Navigate(View::Focus("GC=F".into()))).await);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(svc.view("GC=F").and_then(|v| v.report().cloned()).is_some());

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(1), task)
        .await
        .expect("scheduler did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_series_cache_counts_fetches() {
    let cache: SeriesCache<RawSeries> = SeriesCache::new(std::time::Duration::from_secs(30));
    let calls = AtomicUsize::new(0);
    let calls = &calls;

    for _ in 0..4 {
        let series = cache
            .get_or_fetch("EURUSD=X", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, EngineError>(bars("EURUSD=X", 60, 1.08))
            })
            .await
            .unwrap();
        assert_eq!(series.len(), 60);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
