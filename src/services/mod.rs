pub mod cache;
pub mod refresh;
pub mod signals;

pub use cache::SeriesCache;
pub use refresh::{Command, RefreshSettings, Scheduler, SchedulerHandle, SignalService, View};
pub use signals::{EngineConfig, SignalEngine};
