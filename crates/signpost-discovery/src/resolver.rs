//! Resolver abstractions and entry-backed resolvers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use signpost_core::Entries;

use crate::error::{DiscoveryError, Result};

/// Turns a hierarchical name into an ordered set of routing entries.
///
/// Resolved entries are shared immutably; callers holding the returned
/// `Arc` see the exact value any cache layer stored.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves `name` to routing entries.
    async fn resolve(&self, name: &str) -> Result<Arc<Entries>>;
}

/// Serves a fixed set of pre-computed entries.
///
/// In strict mode the entries must cover the queried name (some entry
/// scope has to contain it), otherwise the query answers
/// [`DiscoveryError::NoMatch`]. A lenient resolver hands the entries back
/// unconditionally.
#[derive(Debug, Clone)]
pub struct SimpleResolver {
    entries: Arc<Entries>,
    strict: bool,
}

impl SimpleResolver {
    /// Creates a resolver over `entries`.
    #[must_use]
    pub fn new(entries: Arc<Entries>, strict: bool) -> Self {
        Self { entries, strict }
    }
}

#[async_trait]
impl Resolver for SimpleResolver {
    async fn resolve(&self, name: &str) -> Result<Arc<Entries>> {
        if self.strict && !self.entries.covers(name) {
            return Err(DiscoveryError::NoMatch {
                name: name.to_string(),
            });
        }
        Ok(Arc::clone(&self.entries))
    }
}

/// Builds resolvers that serve freshly fetched entries.
pub trait ResolverFactory: Send + Sync {
    /// Builds a resolver over `entries`.
    fn build(&self, entries: Arc<Entries>) -> Arc<dyn Resolver>;
}

/// Factory for strict [`SimpleResolver`]s.
///
/// Served entries must cover the queried name, which is how non-ancestor
/// namespace extensions get rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedEntriesFactory;

impl ResolverFactory for ScopedEntriesFactory {
    fn build(&self, entries: Arc<Entries>) -> Arc<dyn Resolver> {
        Arc::new(SimpleResolver::new(entries, true))
    }
}

/// Factory for lenient [`SimpleResolver`]s.
///
/// Entries pass through without any ancestry check; useful when arbitrary
/// extensions should merge in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassEntriesFactory;

impl ResolverFactory for PassEntriesFactory {
    fn build(&self, entries: Arc<Entries>) -> Arc<dyn Resolver> {
        Arc::new(SimpleResolver::new(entries, false))
    }
}

/// A fixed chain of resolvers acting as a recursion budget.
///
/// `resolve` delegates to the head of the chain. Callers that need to
/// re-enter resolution [`descend`](MultiResolver::descend) to the tail;
/// an exhausted chain is the termination guard for pathologically chained
/// extensions.
#[derive(Clone)]
pub struct MultiResolver {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl MultiResolver {
    /// Creates a chain from the given resolvers.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// Creates a chain repeating `base` `depth` times.
    #[must_use]
    pub fn with_depth(base: Arc<dyn Resolver>, depth: usize) -> Self {
        Self {
            resolvers: vec![base; depth],
        }
    }

    /// Remaining recursion budget.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.resolvers.len()
    }

    /// The chain below the head.
    #[must_use]
    pub fn descend(&self) -> Self {
        Self {
            resolvers: self.resolvers.get(1..).unwrap_or_default().to_vec(),
        }
    }
}

impl fmt::Debug for MultiResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiResolver")
            .field("depth", &self.resolvers.len())
            .finish()
    }
}

#[async_trait]
impl Resolver for MultiResolver {
    async fn resolve(&self, name: &str) -> Result<Arc<Entries>> {
        match self.resolvers.first() {
            Some(head) => head.resolve(name).await,
            None => Err(DiscoveryError::DepthExhausted {
                name: name.to_string(),
            }),
        }
    }
}
