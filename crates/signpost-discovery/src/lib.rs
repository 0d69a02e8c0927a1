//! # Signpost Discovery
//!
//! Namespace discovery for hierarchical image names. Given a name such as
//! `example.com/project/main`, the resolver fetches
//! `https://<name>?docker-discovery=1`, reads the `docker-*` meta tags out
//! of the returned HTML head, walks `docker-namespace` delegations with
//! cycle protection, and merges everything into one deterministic set of
//! routing entries.
//!
//! The pieces compose: [`HttpResolver`] drives discovery, [`CacheResolver`]
//! adds an expiring cache in front of any [`Resolver`], [`MultiResolver`]
//! bounds re-entrant resolution, and [`SimpleResolver`] serves pre-computed
//! entries (for example, loaded from a namespace file).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use signpost_discovery::{CacheResolver, HttpResolver, HttpResolverConfig, Resolver};
//!
//! # async fn run() -> Result<(), signpost_discovery::DiscoveryError> {
//! let resolver = Arc::new(HttpResolver::new(HttpResolverConfig::new())?);
//! let cached = CacheResolver::new(resolver);
//!
//! let entries = cached.resolve("example.com/library/bar").await?;
//! for entry in entries.iter() {
//!     println!("{entry}");
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod http;
mod parser;
mod resolver;

pub use cache::{CacheResolver, EntriesCache, ExpiringEntriesCache};
pub use config::{CacheConfig, HttpResolverConfig, DEFAULT_EXPIRE_AFTER, DEFAULT_MAX_ENTRIES};
pub use error::{DiscoveryError, Result};
pub use http::{
    BoxError, HttpClient, HttpResolver, HttpResponse, NsResolveAction, NsResolveCallback,
};
pub use parser::parse_discovery_document;
pub use resolver::{
    MultiResolver, PassEntriesFactory, Resolver, ResolverFactory, ScopedEntriesFactory,
    SimpleResolver,
};
