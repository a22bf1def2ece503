//! TTL snapshot cache around the presence log parse.
//!
//! Parsing the CSV is the expensive step, so the parsed dataset is held
//! as an immutable snapshot and re-read at most once per TTL window.
//! The hot path shares the snapshot `Arc` through a read lock; a stale
//! hit upgrades to the write lock and re-checks staleness before
//! parsing, so concurrent misses collapse into a single parse.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{Dataset, Result};
use tokio::sync::RwLock;
use tracing::debug;

use crate::parser;

/// A parsed dataset with staleness tracking.
#[derive(Clone)]
struct Snapshot {
    dataset: Arc<Dataset>,
    taken_at: Instant,
}

impl Snapshot {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.taken_at.elapsed() > ttl
    }
}

/// TTL-guarded single-snapshot cache over a parse closure.
pub struct PresenceCache {
    ttl: Duration,
    parse: Box<dyn Fn() -> Result<Dataset> + Send + Sync>,
    slot: RwLock<Option<Snapshot>>,
}

impl PresenceCache {
    /// Cache over an arbitrary parse closure.
    pub fn new<F>(ttl: Duration, parse: F) -> Self
    where
        F: Fn() -> Result<Dataset> + Send + Sync + 'static,
    {
        Self {
            ttl,
            parse: Box::new(parse),
            slot: RwLock::new(None),
        }
    }

    /// Cache that re-reads the CSV log at `path`.
    pub fn for_csv(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let path = path.into();
        Self::new(ttl, move || parser::load(&path))
    }

    /// Current dataset, parsing only when no fresh snapshot exists.
    ///
    /// A parse failure propagates to the caller and leaves any previous
    /// snapshot in place, so a later call can retry.
    pub async fn get(&self) -> Result<Arc<Dataset>> {
        if let Some(snapshot) = self.slot.read().await.as_ref() {
            if !snapshot.is_stale(self.ttl) {
                return Ok(snapshot.dataset.clone());
            }
        }

        let mut slot = self.slot.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(snapshot) = slot.as_ref() {
            if !snapshot.is_stale(self.ttl) {
                return Ok(snapshot.dataset.clone());
            }
        }

        let dataset = Arc::new((self.parse)()?);
        debug!("presence snapshot refreshed: {} users", dataset.len());
        *slot = Some(Snapshot {
            dataset: dataset.clone(),
            taken_at: Instant::now(),
        });
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use common::{Error, PresenceRecord, UserPresenceMap};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiny_dataset() -> Dataset {
        let mut days = UserPresenceMap::new();
        days.insert(
            NaiveDate::from_ymd_opt(2013, 9, 10).unwrap(),
            PresenceRecord {
                start: NaiveTime::from_hms_opt(9, 39, 5).unwrap(),
                end: NaiveTime::from_hms_opt(17, 59, 52).unwrap(),
            },
        );
        let mut dataset = Dataset::new();
        dataset.insert(10, days);
        dataset
    }

    fn counting_cache(ttl: Duration) -> (Arc<PresenceCache>, Arc<AtomicUsize>) {
        let parses = Arc::new(AtomicUsize::new(0));
        let counter = parses.clone();
        let cache = PresenceCache::new(ttl, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(tiny_dataset())
        });
        (Arc::new(cache), parses)
    }

    #[tokio::test]
    async fn test_fresh_hit_does_not_parse_again() {
        let (cache, parses) = counting_cache(Duration::from_secs(600));
        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();
        assert_eq!(
            parses.load(Ordering::SeqCst),
            1,
            "a fresh snapshot must be reused"
        );
        assert!(
            Arc::ptr_eq(&first, &second),
            "both gets should share one snapshot"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_collapse_into_one_parse() {
        let (cache, parses) = counting_cache(Duration::from_secs(600));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.get().await.unwrap().len() }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(
            parses.load(Ordering::SeqCst),
            1,
            "racing gets must trigger exactly one parse"
        );
    }

    #[tokio::test]
    async fn test_expired_snapshot_is_parsed_again() {
        let (cache, parses) = counting_cache(Duration::ZERO);
        let before = cache.get().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let after = cache.get().await.unwrap();
        assert_eq!(parses.load(Ordering::SeqCst), 2, "expiry must force a re-read");
        // A handle taken before the refresh stays readable after it.
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_failure_surfaces_and_retry_recovers() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let cache = PresenceCache::new(Duration::from_secs(600), move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Data("log not ready".into()))
            } else {
                Ok(tiny_dataset())
            }
        });
        assert!(cache.get().await.is_err(), "first failure must reach the caller");
        let dataset = cache.get().await.unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
