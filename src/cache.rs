// src/cache.rs

//! Time-boxed result cache.
//!
//! Entries expire a fixed validity window after they were stored. Backed by
//! Moka, so concurrent fetches may race to populate a key (last write wins)
//! without corrupting it.

use std::time::Duration;

use moka::sync::Cache;

/// Key of the aggregate public dataset.
pub const SITE_DATA_KEY: &str = "siteData";

/// Default validity window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// In-process cache keyed by logical dataset name.
pub struct ResultCache<V> {
    ttl: Duration,
    entries: Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> ResultCache<V> {
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder().time_to_live(ttl).build();
        Self { ttl, entries }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for `key`, unless absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.entries.get(key);
        log::debug!(
            "Cache {} for '{}'",
            if value.is_some() { "hit" } else { "miss" },
            key
        );
        value
    }

    /// Store `value` under `key`, replacing any prior entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    /// Remove one key, or everything when `key` is `None`.
    pub fn invalidate(&self, key: Option<&str>) {
        match key {
            Some(key) => self.entries.invalidate(key),
            None => self.entries.invalidate_all(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        // Moka applies removals lazily; flush them before counting.
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync + 'static> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
