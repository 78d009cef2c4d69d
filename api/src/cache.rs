use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Default freshness window for stats endpoints.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Live game landing, boxscore and play-by-play.
pub const LIVE_TTL: Duration = Duration::from_secs(30);
/// Today's schedule and player search results.
pub const SHORT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
}

/// Process-wide store of parsed responses keyed by request signature.
///
/// Entries only go stale; nothing is evicted until [`ResponseCache::clear`],
/// so the store grows for the life of the process. That is fine for a single
/// interactive session and would need a bound in a long-running server.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key` if it was stored less than `ttl` ago.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < ttl {
            debug!("cache hit: {key}");
            Some(entry.value.clone())
        } else {
            debug!("cache stale: {key}");
            None
        }
    }

    /// Store (or overwrite) `value` under `key`, stamped with the current time.
    pub fn put(&self, key: impl Into<String>, value: Value) {
        let entry = CacheEntry { value, stored_at: Instant::now() };
        self.lock().insert(key.into(), entry);
    }

    /// Drop every entry regardless of age.
    pub fn clear(&self) {
        let mut entries = self.lock();
        debug!("clearing {} cached responses", entries.len());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The guard is never held across an await, and a poisoned map still holds
    // valid entries.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
