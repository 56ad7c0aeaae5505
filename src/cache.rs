//! In-memory response cache
//!
//! Provides a generic time-boxed memo used to bound the rate of outbound
//! calls to the weather provider. Entries live for a fixed window and are
//! lazily treated as absent once they age out; nothing is evicted
//! proactively and nothing is persisted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long a cached response stays valid
pub const CACHE_TTL: Duration = Duration::from_millis(60_000);

/// A cached value together with the time it was stored
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    stored_at: Instant,
}

/// Process-lifetime key-to-value memo with a fixed time-to-live
///
/// The map is guarded by a single mutex; fetches for different locations run
/// as sibling futures on a multithreaded runtime, and contention on the map
/// is low. The key space is bounded by the favorite-location count times the
/// request kinds and unit systems, so the map carries no size limit.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// Creates a cache with the standard 60-second TTL
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    /// Creates a cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value stored under `key` if one exists and is still fresh
    ///
    /// An entry whose age has reached the TTL reads as absent; it stays in
    /// the map until the next `set` for the same key overwrites it.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.payload.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn set(&self, key: &str, value: T) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload: value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Rewinds an entry's storage time by `age`
    ///
    /// Lets expiry tests control the observed age of an entry without
    /// sleeping, while the TTL itself stays a constant.
    #[cfg(test)]
    pub fn backdate(&self, key: &str, age: Duration) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        if let Some(entry) = entries.get_mut(key) {
            entry.stored_at -= age;
        }
    }
}
