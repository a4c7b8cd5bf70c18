//! Named Moka cache with predicate invalidation.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::warn;

/// Capacity and lifetime of one cache.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub ttl: Duration,
}

impl CacheConfig {
    /// Farewell settings are read once per departure and rarely written.
    pub fn settings() -> Self {
        Self {
            max_capacity: 2_000,
            ttl: Duration::from_secs(300),
        }
    }
}

/// A named cache. Clones share the same entries.
#[derive(Clone)]
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
    name: Arc<str>,
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .support_invalidation_closures()
            .build();

        Self {
            inner,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Drop every entry whose key matches. Applied lazily by Moka, but
    /// matching entries are never returned again.
    pub fn invalidate_where<F>(&self, predicate: F)
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        if let Err(e) = self.inner.invalidate_entries_if(move |k, _| predicate(k)) {
            warn!("{} cache: predicate invalidation failed, clearing: {}", self.name, e);
            self.inner.invalidate_all();
        }
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
