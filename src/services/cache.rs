use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Per-key cache with TTL and single-flight fills.
///
/// Each key owns a slot guarded by an async mutex. A caller that finds the
/// slot stale fetches while holding the lock, so concurrent callers for the
/// same key wait for that one fetch instead of issuing their own. Fresh
/// values replace the old entry wholesale; failed fetches leave it alone.
pub struct SeriesCache<V> {
    slots: DashMap<String, Arc<Mutex<Option<CacheEntry<V>>>>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: Arc<V>,
    fetched_at: Instant,
}

impl<V> SeriesCache<V> {
    /// Create a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, key: &str) -> Arc<Mutex<Option<CacheEntry<V>>>> {
        self.slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Return the cached value if fresh, otherwise run `fetch` and store it.
    ///
    /// Dropping the returned future mid-fetch releases the slot and keeps the
    /// previous entry.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let mut guard = slot.lock().await;

        if let Some(entry) = guard.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                debug!(key, "Cache hit");
                return Ok(entry.value.clone());
            }
        }

        let value = Arc::new(fetch().await?);
        *guard = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });

        Ok(value)
    }

    /// Number of keys with a slot (fresh or stale).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fetches_once_within_ttl() {
        let cache: SeriesCache<u32> = SeriesCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..3 {
            let value = cache
                .get_or_fetch("BTC-USD", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(7)
                })
                .await
                .unwrap();
            assert_eq!(*value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetches_after_ttl() {
        let cache: SeriesCache<u32> = SeriesCache::new(Duration::from_millis(10));
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let fetch = || async move {
            Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) as u32)
        };

        assert_eq!(*cache.get_or_fetch("GC=F", fetch).await.unwrap(), 0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*cache.get_or_fetch("GC=F", fetch).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_not_cached() {
        let cache: SeriesCache<u32> = SeriesCache::new(Duration::from_secs(60));

        let err = cache
            .get_or_fetch("XYZ", || async { Err::<u32, _>("down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "down");
        let slot = cache.slot("XYZ");
        assert!(slot.lock().await.is_none());

        let value = cache
            .get_or_fetch("XYZ", || async { Ok::<_, String>(3) })
            .await
            .unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_entry() {
        let cache: SeriesCache<u32> = SeriesCache::new(Duration::from_millis(10));
        cache
            .get_or_fetch("ES=F", || async { Ok::<_, String>(1) })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let _ = cache
            .get_or_fetch("ES=F", || async { Err::<u32, _>("timeout".to_string()) })
            .await;

        let slot = cache.slot("ES=F");
        let guard = slot.lock().await;
        assert_eq!(guard.as_ref().map(|e| *e.value), Some(1));
    }

    #[tokio::test]
    async fn test_single_flight_for_concurrent_callers() {
        let cache: Arc<SeriesCache<u32>> = Arc::new(SeriesCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_fetch("EURUSD=X", move || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, String>(42)
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(*task.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: SeriesCache<&'static str> = SeriesCache::new(Duration::from_secs(60));
        cache.get_or_fetch("A", || async { Ok::<_, ()>("a") }).await.unwrap();
        cache.get_or_fetch("B", || async { Ok::<_, ()>("b") }).await.unwrap();
        assert_eq!(cache.len(), 2);
        assert!(!cache.is_empty());

        let a = cache.get_or_fetch("A", || async { Ok::<_, ()>("z") }).await.unwrap();
        let b = cache.get_or_fetch("B", || async { Ok::<_, ()>("z") }).await.unwrap();
        assert_eq!((*a, *b), ("a", "b"));
    }

    #[tokio::test]
    async fn test_cancelled_fetch_keeps_cache_usable() {
        let cache: SeriesCache<u32> = SeriesCache::new(Duration::from_secs(60));
        let pending = cache.get_or_fetch("BTC-USD", || async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, String>(1)
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());

        let value = cache
            .get_or_fetch("BTC-USD", || async { Ok::<_, String>(2) })
            .await
            .unwrap();
        assert_eq!(*value, 2);
    }
}
