//! Expiring entry caches and the caching resolver.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use signpost_core::Entries;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::resolver::Resolver;

/// Cache capability used by [`CacheResolver`].
pub trait EntriesCache: Send + Sync {
    /// Returns the cached value for `name`, if present and live.
    fn lookup(&self, name: &str) -> Option<Arc<Entries>>;

    /// Stores `entries` under `name`, displacing any previous value.
    fn store(&self, name: &str, entries: Arc<Entries>);
}

struct CacheEntry {
    created: Instant,
    entries: Arc<Entries>,
}

#[derive(Default)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    /// Keys in insertion order; the head is always the oldest live entry.
    queue: VecDeque<String>,
}

/// Thread-safe cache that evicts entries by age and by capacity.
///
/// Expired entries are swept from the head of the insertion queue whenever
/// any operation observes them, and a full cache drops its oldest entry to
/// make room. All state sits behind one mutex which is never held across
/// I/O; the cached `Arc<Entries>` values are immutable, so readers always
/// see a consistent snapshot.
pub struct ExpiringEntriesCache {
    inner: Mutex<CacheInner>,
    config: CacheConfig,
}

impl ExpiringEntriesCache {
    /// Creates a cache with the given configuration.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            config,
        }
    }

    /// The cache configuration.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of live entries. Expired entries still waiting for a sweep
    /// are counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_expired(&self, inner: &mut CacheInner, now: Instant) {
        let Some(ttl) = self.config.expire_after else {
            return;
        };
        while let Some(front) = inner.queue.front() {
            let live = inner
                .map
                .get(front)
                .is_some_and(|entry| now.duration_since(entry.created) <= ttl);
            if live {
                break;
            }
            if let Some(key) = inner.queue.pop_front() {
                inner.map.remove(&key);
                debug!(name = %key, "evicted expired cache entry");
            }
        }
    }
}

impl Default for ExpiringEntriesCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl fmt::Debug for ExpiringEntriesCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringEntriesCache")
            .field("config", &self.config)
            .field("len", &self.len())
            .finish()
    }
}

impl EntriesCache for ExpiringEntriesCache {
    fn lookup(&self, name: &str) -> Option<Arc<Entries>> {
        let mut inner = self.inner.lock();
        self.sweep_expired(&mut inner, Instant::now());
        inner.map.get(name).map(|entry| Arc::clone(&entry.entries))
    }

    fn store(&self, name: &str, entries: Arc<Entries>) {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        self.sweep_expired(&mut inner, now);
        if inner.map.remove(name).is_some() {
            inner.queue.retain(|key| key != name);
        }
        if let Some(max) = self.config.max_entries {
            if inner.map.len() >= max {
                if let Some(oldest) = inner.queue.pop_front() {
                    inner.map.remove(&oldest);
                    debug!(name = %oldest, "evicted oldest cache entry");
                }
            }
        }
        inner.queue.push_back(name.to_string());
        inner.map.insert(name.to_string(), CacheEntry { created: now, entries });
    }
}

/// Caching wrapper around a base resolver.
///
/// Successful resolutions are stored and served on subsequent calls;
/// errors always come straight from the base resolver and are never
/// cached. Concurrent resolves of one name may each reach the base, and
/// the later store displaces the earlier value.
pub struct CacheResolver {
    base: Arc<dyn Resolver>,
    cache: Arc<dyn EntriesCache>,
}

impl CacheResolver {
    /// Wraps `base` with a default [`ExpiringEntriesCache`].
    #[must_use]
    pub fn new(base: Arc<dyn Resolver>) -> Self {
        Self::with_cache(base, Arc::new(ExpiringEntriesCache::default()))
    }

    /// Wraps `base` with a specific cache implementation.
    #[must_use]
    pub fn with_cache(base: Arc<dyn Resolver>, cache: Arc<dyn EntriesCache>) -> Self {
        Self { base, cache }
    }
}

impl fmt::Debug for CacheResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for CacheResolver {
    async fn resolve(&self, name: &str) -> Result<Arc<Entries>> {
        if let Some(hit) = self.cache.lookup(name) {
            debug!(name, "cache hit");
            return Ok(hit);
        }
        let entries = self.base.resolve(name).await?;
        self.cache.store(name, Arc::clone(&entries));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiscoveryError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn entries_for(scope: &str) -> Arc<Entries> {
        Arc::new(
            format!("{scope} index https://search.example.com/")
                .parse()
                .unwrap(),
        )
    }

    #[test]
    fn test_store_and_lookup() {
        let cache = ExpiringEntriesCache::default();
        cache.store("example.com/a", entries_for("example.com"));
        let hit = cache.lookup("example.com/a").unwrap();
        assert_eq!(hit, entries_for("example.com"));
        assert!(cache.lookup("example.com/b").is_none());
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = ExpiringEntriesCache::new(
            CacheConfig::new().with_expire_after(Duration::from_millis(10)),
        );
        cache.store("example.com/a", entries_for("example.com"));
        assert!(cache.lookup("example.com/a").is_some());

        std::thread::sleep(Duration::from_millis(25));
        assert!(cache.lookup("example.com/a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_no_expiry_when_disabled() {
        let cache = ExpiringEntriesCache::new(
            CacheConfig::new().without_expiry().with_max_entries(4),
        );
        cache.store("example.com/a", entries_for("example.com"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.lookup("example.com/a").is_some());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = ExpiringEntriesCache::new(
            CacheConfig::new().without_expiry().with_max_entries(2),
        );
        cache.store("a", entries_for("example.com"));
        cache.store("b", entries_for("example.com"));
        cache.store("c", entries_for("example.com"));

        assert!(cache.lookup("a").is_none());
        assert!(cache.lookup("b").is_some());
        assert!(cache.lookup("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_replace_moves_entry_to_queue_tail() {
        let cache = ExpiringEntriesCache::new(
            CacheConfig::new().without_expiry().with_max_entries(2),
        );
        cache.store("a", entries_for("example.com"));
        cache.store("b", entries_for("example.com"));
        // overwriting "a" re-inserts it at the tail, so "b" is now oldest
        cache.store("a", entries_for("example.com/other"));
        cache.store("c", entries_for("example.com"));

        assert!(cache.lookup("b").is_none());
        assert_eq!(cache.lookup("a").unwrap(), entries_for("example.com/other"));
        assert!(cache.lookup("c").is_some());
    }

    #[test]
    fn test_unbounded_cache_keeps_everything() {
        let cache = ExpiringEntriesCache::new(CacheConfig::new().without_expiry().unbounded());
        for i in 0..100 {
            cache.store(&format!("name-{i}"), entries_for("example.com"));
        }
        assert_eq!(cache.len(), 100);
    }

    struct CountingResolver {
        entries: Arc<Entries>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Resolver for CountingResolver {
        async fn resolve(&self, _name: &str) -> Result<Arc<Entries>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::clone(&self.entries))
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl Resolver for FailingResolver {
        async fn resolve(&self, name: &str) -> Result<Arc<Entries>> {
            Err(DiscoveryError::Http {
                name: name.to_string(),
                status: 404,
            })
        }
    }

    #[tokio::test]
    async fn test_cache_resolver_serves_second_call_from_cache() {
        let base = Arc::new(CountingResolver {
            entries: entries_for("example.com"),
            calls: AtomicUsize::new(0),
        });
        let resolver = CacheResolver::new(Arc::clone(&base) as Arc<dyn Resolver>);

        let first = resolver.resolve("example.com/library/bar").await.unwrap();
        let second = resolver.resolve("example.com/library/bar").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(base.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_resolver_never_caches_errors() {
        let resolver = CacheResolver::new(Arc::new(FailingResolver));
        for _ in 0..2 {
            let err = resolver.resolve("example.com/app").await.unwrap_err();
            assert!(matches!(err, DiscoveryError::Http { status: 404, .. }));
        }
    }
}
