// src/cache.rs
// TTL response cache. Stale entries are evicted when read.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: Instant,
}

pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                tracing::debug!("Cache HIT: {}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Cache EXPIRED: {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, including stale ones not yet read.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
