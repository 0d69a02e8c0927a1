//! Configuration types for resolvers and caches.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::http::{HttpClient, NsResolveCallback};
use crate::resolver::ResolverFactory;

/// Default time-to-live for cached resolutions.
pub const DEFAULT_EXPIRE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// Default cache capacity.
pub const DEFAULT_MAX_ENTRIES: usize = 512;

/// Configuration for [`HttpResolver`](crate::HttpResolver).
///
/// Every field has a default: a fresh `reqwest` client, the strict
/// [`ScopedEntriesFactory`](crate::ScopedEntriesFactory), and the
/// ancestor-only recursion policy.
#[derive(Default)]
pub struct HttpResolverConfig {
    /// HTTP capability used for discovery requests.
    pub client: Option<Arc<dyn HttpClient>>,

    /// Factory building resolvers over fetched extension entries.
    pub resolver_factory: Option<Arc<dyn ResolverFactory>>,

    /// Extension policy callback.
    pub ns_resolve_callback: Option<NsResolveCallback>,

    /// Log and skip failing namespace extensions instead of aborting.
    pub ignore_discovery_errors: bool,
}

impl HttpResolverConfig {
    /// Creates a configuration with every default in place.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP capability.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the factory for resolvers over fetched extension entries.
    #[must_use]
    pub fn with_resolver_factory(mut self, factory: Arc<dyn ResolverFactory>) -> Self {
        self.resolver_factory = Some(factory);
        self
    }

    /// Sets the extension policy callback.
    #[must_use]
    pub fn with_ns_resolve_callback(mut self, callback: NsResolveCallback) -> Self {
        self.ns_resolve_callback = Some(callback);
        self
    }

    /// Tolerates extension discovery failures instead of aborting the walk.
    #[must_use]
    pub const fn with_ignore_discovery_errors(mut self, ignore: bool) -> Self {
        self.ignore_discovery_errors = ignore;
        self
    }
}

impl fmt::Debug for HttpResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResolverConfig")
            .field("client", &self.client.as_ref().map(|_| "..."))
            .field("resolver_factory", &self.resolver_factory.as_ref().map(|_| "..."))
            .field("ns_resolve_callback", &self.ns_resolve_callback.as_ref().map(|_| "..."))
            .field("ignore_discovery_errors", &self.ignore_discovery_errors)
            .finish()
    }
}

/// Configuration for [`ExpiringEntriesCache`](crate::ExpiringEntriesCache).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use signpost_discovery::CacheConfig;
///
/// let config = CacheConfig::new()
///     .with_expire_after(Duration::from_secs(60))
///     .with_max_entries(128);
/// assert_eq!(config.max_entries, Some(128));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for cached results; `None` keeps entries until evicted.
    pub expire_after: Option<Duration>,

    /// Maximum number of cached names; `None` leaves the cache unbounded.
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expire_after: Some(DEFAULT_EXPIRE_AFTER),
            max_entries: Some(DEFAULT_MAX_ENTRIES),
        }
    }
}

impl CacheConfig {
    /// Creates a configuration with the default TTL and capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time-to-live for cached results.
    #[must_use]
    pub const fn with_expire_after(mut self, ttl: Duration) -> Self {
        self.expire_after = Some(ttl);
        self
    }

    /// Disables expiry entirely.
    #[must_use]
    pub const fn without_expiry(mut self) -> Self {
        self.expire_after = None;
        self
    }

    /// Bounds the cache to `max` names.
    #[must_use]
    pub const fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Removes the capacity bound.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_entries = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.expire_after, Some(DEFAULT_EXPIRE_AFTER));
        assert_eq!(config.max_entries, Some(DEFAULT_MAX_ENTRIES));
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new()
            .with_expire_after(Duration::from_millis(5))
            .unbounded();
        assert_eq!(config.expire_after, Some(Duration::from_millis(5)));
        assert_eq!(config.max_entries, None);

        let config = CacheConfig::new().without_expiry().with_max_entries(2);
        assert_eq!(config.expire_after, None);
        assert_eq!(config.max_entries, Some(2));
    }

    #[test]
    fn test_resolver_config_defaults() {
        let config = HttpResolverConfig::new();
        assert!(config.client.is_none());
        assert!(config.resolver_factory.is_none());
        assert!(config.ns_resolve_callback.is_none());
        assert!(!config.ignore_discovery_errors);
    }
}
