//! Signal board and refresh scheduler.
//!
//! [`SignalService`] owns the fetch → analyze step for every watched
//! instrument and keeps the latest [`SymbolView`] per symbol. [`Scheduler`]
//! drives it: a timer tick refreshes whatever the current view shows, and
//! navigation commands switch the cadence and refresh the newly focused
//! instrument at once.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::cache::SeriesCache;
use super::signals::SignalEngine;
use crate::error::EngineError;
use crate::sources::{BarRequest, MarketDataProvider};
use crate::types::{Instrument, RawSeries, SymbolView};

/// Fetch and cadence settings for the service.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub lookback: chrono::Duration,
    pub interval_minutes: u32,
    pub cache_ttl: Duration,
    pub overview_every: Duration,
    pub focus_every: Duration,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            lookback: chrono::Duration::days(5),
            interval_minutes: 15,
            cache_ttl: Duration::from_secs(30),
            overview_every: Duration::from_secs(15),
            focus_every: Duration::from_secs(5),
        }
    }
}

/// What the renderer is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Overview,
    Focus(String),
}

/// Scheduler input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(View),
    Refresh(String),
    RefreshAll,
}

/// Signal board plus the pipeline that fills it.
pub struct SignalService {
    provider: Arc<dyn MarketDataProvider>,
    cache: SeriesCache<RawSeries>,
    engine: SignalEngine,
    instruments: Vec<Instrument>,
    board: DashMap<String, SymbolView>,
    settings: RefreshSettings,
}

impl SignalService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        engine: SignalEngine,
        instruments: Vec<Instrument>,
        settings: RefreshSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            cache: SeriesCache::new(settings.cache_ttl),
            engine,
            instruments,
            board: DashMap::new(),
            settings,
        })
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.settings
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }

    /// Latest view for a symbol, if it has been refreshed at least once.
    pub fn view(&self, symbol: &str) -> Option<SymbolView> {
        self.board.get(symbol).map(|v| v.clone())
    }

    /// All refreshed views in watchlist order.
    pub fn board(&self) -> Vec<SymbolView> {
        self.instruments
            .iter()
            .filter_map(|i| self.view(&i.symbol))
            .collect()
    }

    async fn fetch(&self, symbol: &str) -> Result<Arc<RawSeries>, EngineError> {
        let request = BarRequest::new(
            symbol,
            self.settings.lookback,
            self.settings.interval_minutes,
        );
        self.cache
            .get_or_fetch(symbol, || async move {
                debug!(symbol, provider = self.provider.name(), "Fetching bars");
                self.provider.fetch_bars(&request).await
            })
            .await
    }

    /// Fetch, analyze, and publish one instrument.
    ///
    /// Failures are instrument-scoped: they become an `Unavailable` view and
    /// never propagate.
    pub async fn refresh_instrument(&self, instrument: &Instrument, now: DateTime<Utc>) -> SymbolView {
        let result = match self.fetch(&instrument.symbol).await {
            Ok(raw) => self.engine.analyze(instrument, (*raw).clone(), now),
            Err(e) => Err(e),
        };

        let updated_at = now.timestamp_millis();
        let view = match result {
            Ok(report) => SymbolView::Ready {
                report: Box::new(report),
                updated_at,
            },
            Err(e) => {
                warn!(symbol = %instrument.symbol, kind = e.kind(), "Signal unavailable: {}", e);
                SymbolView::Unavailable {
                    instrument: instrument.clone(),
                    reason: e.to_string(),
                    updated_at,
                }
            }
        };

        self.board.insert(instrument.symbol.clone(), view.clone());
        view
    }

    /// Refresh one watched symbol. `None` if the symbol is not watched.
    pub async fn refresh_symbol(&self, symbol: &str, now: DateTime<Utc>) -> Option<SymbolView> {
        let instrument = self.instrument(symbol)?;
        Some(self.refresh_instrument(instrument, now).await)
    }

    /// Refresh every instrument concurrently. Returns the number that
    /// produced a signal.
    pub async fn refresh_all(&self, now: DateTime<Utc>) -> usize {
        let views = join_all(
            self.instruments
                .iter()
                .map(|instrument| self.refresh_instrument(instrument, now)),
        )
        .await;

        let ready = views.iter().filter(|v| v.report().is_some()).count();
        info!(
            ready,
            unavailable = views.len() - ready,
            "Refresh cycle complete"
        );
        ready
    }
}

/// Sends commands to a running [`Scheduler`].
#[derive(Clone)]
pub struct SchedulerHandle {
    commands: mpsc::Sender<Command>,
}

impl SchedulerHandle {
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Non-blocking send for callers outside async context (the TUI loop).
    pub fn try_send(&self, command: Command) -> bool {
        self.commands.try_send(command).is_ok()
    }

    pub fn navigate(&self, view: View) -> bool {
        self.try_send(Command::Navigate(view))
    }
}

/// Timer plus command loop around a [`SignalService`].
pub struct Scheduler {
    service: Arc<SignalService>,
    commands: mpsc::Receiver<Command>,
    shutdown: watch::Receiver<bool>,
    view: View,
}

impl Scheduler {
    pub fn new(
        service: Arc<SignalService>,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, SchedulerHandle) {
        let (tx, rx) = mpsc::channel(32);
        let scheduler = Self {
            service,
            commands: rx,
            shutdown,
            view: View::Overview,
        };
        (scheduler, SchedulerHandle { commands: tx })
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    fn cadence(&self) -> Duration {
        match self.view {
            View::Overview => self.service.settings.overview_every,
            View::Focus(_) => self.service.settings.focus_every,
        }
    }

    fn ticker(&self, first_in: Duration) -> tokio::time::Interval {
        let mut ticker = interval_at(Instant::now() + first_in, self.cadence());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Refresh whatever the current view shows.
    async fn tick(&self) {
        match &self.view {
            View::Overview => {
                self.service.refresh_all(Utc::now()).await;
            }
            View::Focus(symbol) => {
                self.service.refresh_symbol(symbol, Utc::now()).await;
            }
        }
    }

    /// Run `work` unless shutdown fires first. Returns false on shutdown.
    async fn until_shutdown<F: Future<Output = ()>>(
        shutdown: &mut watch::Receiver<bool>,
        work: F,
    ) -> bool {
        if *shutdown.borrow() {
            return false;
        }
        tokio::select! {
            _ = work => true,
            _ = shutdown.changed() => false,
        }
    }

    /// Apply a command. Returns false on shutdown.
    async fn handle(&mut self, command: Command, ticker: &mut tokio::time::Interval) -> bool {
        let mut shutdown = self.shutdown.clone();
        match command {
            Command::Navigate(view) => {
                debug!(?view, "Navigate");
                self.view = view;
                *ticker = self.ticker(self.cadence());
                Self::until_shutdown(&mut shutdown, self.tick()).await
            }
            Command::Refresh(symbol) => {
                let work = async {
                    if self.service.refresh_symbol(&symbol, Utc::now()).await.is_none() {
                        warn!(symbol = %symbol, "Refresh requested for unknown symbol");
                    }
                };
                Self::until_shutdown(&mut shutdown, work).await
            }
            Command::RefreshAll => {
                let work = async {
                    self.service.refresh_all(Utc::now()).await;
                };
                Self::until_shutdown(&mut shutdown, work).await
            }
        }
    }

    /// Run until the shutdown flag flips to true (or its sender is dropped).
    ///
    /// The first cycle runs immediately. An in-flight cycle is dropped on
    /// shutdown; the cache keeps its previous entries.
    pub async fn run(mut self) {
        info!(
            instruments = self.service.instruments.len(),
            every_secs = self.cadence().as_secs(),
            "Scheduler started"
        );

        let mut ticker = self.ticker(Duration::ZERO);
        let mut shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    if !Self::until_shutdown(&mut shutdown, self.tick()).await {
                        break;
                    }
                }
                Some(command) = self.commands.recv() => {
                    if !self.handle(command, &mut ticker).await {
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }
}
