//! HTTP-backed namespace discovery.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use signpost_core::{Action, Entries, Entry, Scope};
use tracing::{debug, warn};

use crate::config::HttpResolverConfig;
use crate::error::{DiscoveryError, Result};
use crate::parser::parse_discovery_document;
use crate::resolver::{Resolver, ResolverFactory, ScopedEntriesFactory};

/// Boxed error type for [`HttpClient`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Minimal response surface needed by discovery.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body.
    pub body: String,
}

/// Minimal capability for performing discovery requests.
///
/// Implementations must be safe for concurrent use; the resolver performs
/// no locking around them.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs a GET against `url`.
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, BoxError>;
}

#[async_trait]
impl HttpClient for reqwest::Client {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, BoxError> {
        let response = reqwest::Client::get(self, url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Extension policy decision for one `docker-namespace` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsResolveAction {
    /// Keep the argument and run discovery on it, merging the results.
    Recurse,
    /// Keep the argument without discovering it.
    Pass,
    /// Drop the argument from the resulting entries.
    Ignore,
}

/// Extension policy callback.
///
/// Called once per namespace argument that differs from the current name,
/// with the argument parsed as a scope. Called once with `None` for every
/// namespace entry whose arguments pruned down to nothing; answering
/// [`NsResolveAction::Ignore`] then removes the entry entirely.
pub type NsResolveCallback = Arc<dyn Fn(&str, Option<&Scope>) -> NsResolveAction + Send + Sync>;

/// Default policy: recurse into ancestor scopes, ignore everything else.
fn default_ns_resolve_callback(name: &str, scope: Option<&Scope>) -> NsResolveAction {
    match scope {
        Some(scope) if scope.contains(name) => NsResolveAction::Recurse,
        _ => NsResolveAction::Ignore,
    }
}

/// Discovery-driven resolver.
///
/// `resolve` fetches `https://<name>?docker-discovery=1`, parses the
/// `docker-*` meta tags out of the body, and walks `docker-namespace`
/// extensions according to the configured policy. Extension results are
/// served through the configured [`ResolverFactory`] before merging, so the
/// strict default rejects extensions that do not cover the name.
///
/// Each call carries its own visited set: a discovery graph with cycles
/// terminates, and every name is fetched at most once per call. The
/// resolver itself is stateless, so any number of calls may run
/// concurrently.
pub struct HttpResolver {
    client: Arc<dyn HttpClient>,
    resolver_factory: Arc<dyn ResolverFactory>,
    ns_resolve_callback: NsResolveCallback,
    ignore_discovery_errors: bool,
}

impl HttpResolver {
    /// Creates a resolver from `config`, filling in defaults for anything
    /// unset.
    ///
    /// # Errors
    ///
    /// Fails only when no client was supplied and the default `reqwest`
    /// client cannot be built.
    pub fn new(config: HttpResolverConfig) -> Result<Self> {
        let client = match config.client {
            Some(client) => client,
            None => Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("signpost/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|source| DiscoveryError::ClientBuild { source })?,
            ),
        };
        Ok(Self {
            client,
            resolver_factory: config
                .resolver_factory
                .unwrap_or_else(|| Arc::new(ScopedEntriesFactory)),
            ns_resolve_callback: config
                .ns_resolve_callback
                .unwrap_or_else(|| Arc::new(default_ns_resolve_callback)),
            ignore_discovery_errors: config.ignore_discovery_errors,
        })
    }

    fn discovery_url(name: &str) -> String {
        format!("https://{name}?docker-discovery=1")
    }

    async fn fetch(&self, name: &str) -> Result<Entries> {
        let url = Self::discovery_url(name);
        debug!(name, url = %url, "fetching discovery document");
        let response =
            self.client
                .get(&url)
                .await
                .map_err(|err| DiscoveryError::Transport {
                    name: name.to_string(),
                    message: err.to_string(),
                })?;
        if !(200..300).contains(&response.status) {
            return Err(DiscoveryError::Http {
                name: name.to_string(),
                status: response.status,
            });
        }
        parse_discovery_document(&response.body, name)
    }

    /// One frame of the discovery walk: fetch and parse `name`, prune its
    /// namespace entries, then merge every surviving extension.
    fn resolve_entries<'a>(
        &'a self,
        visited: &'a mut HashSet<String>,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Entries>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = self.fetch(name).await?;
            let extensions = self.apply_extension_policy(&mut entries, visited, name)?;
            visited.insert(name.to_string());
            for extension in extensions {
                if visited.contains(extension.as_str()) {
                    continue;
                }
                match self.expand_extension(visited, &extension, name).await {
                    Ok(served) => entries = entries.join(&served)?,
                    Err(err) if self.ignore_discovery_errors => {
                        warn!(
                            name,
                            extension = %extension,
                            error = %err,
                            "ignoring namespace extension discovery failure"
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(entries)
        })
    }

    /// Applies the namespace policy to freshly parsed entries, returning
    /// the extensions to discover in document order.
    fn apply_extension_policy(
        &self,
        entries: &mut Entries,
        visited: &HashSet<String>,
        name: &str,
    ) -> Result<Vec<Scope>> {
        let mut extensions: Vec<Scope> = Vec::new();
        let namespace_entries: Vec<Entry> = entries
            .iter()
            .filter(|entry| entry.action() == Action::Namespace)
            .cloned()
            .collect();
        for entry in namespace_entries {
            let mut kept: Vec<String> = Vec::new();
            for arg in entry.args() {
                // an extension naming the current name is left alone
                if arg == name {
                    kept.push(arg.clone());
                    continue;
                }
                let scope = Scope::parse(arg)?;
                match (self.ns_resolve_callback)(name, Some(&scope)) {
                    NsResolveAction::Ignore => {}
                    NsResolveAction::Pass => kept.push(arg.clone()),
                    NsResolveAction::Recurse => {
                        if !visited.contains(arg.as_str())
                            && !extensions.iter().any(|e| e.as_str() == arg)
                        {
                            extensions.push(scope);
                        }
                        kept.push(arg.clone());
                    }
                }
            }
            let drop_entry = kept.is_empty()
                && (self.ns_resolve_callback)(name, None) == NsResolveAction::Ignore;
            if kept.len() == entry.args().len() && !drop_entry {
                continue;
            }
            entries.remove(&entry);
            if !drop_entry {
                entries.add(Entry::new(entry.scope().clone(), Action::Namespace, kept))?;
            }
        }
        Ok(extensions)
    }

    /// Discovers one extension and serves its entries through the
    /// configured factory, so the factory decides whether out-of-scope
    /// results are usable for `name`.
    async fn expand_extension(
        &self,
        visited: &mut HashSet<String>,
        extension: &Scope,
        name: &str,
    ) -> Result<Arc<Entries>> {
        let fetched = self.resolve_entries(visited, extension.as_str()).await?;
        let resolver = self.resolver_factory.build(Arc::new(fetched));
        match resolver.resolve(name).await {
            Err(DiscoveryError::NoMatch { .. }) => Err(DiscoveryError::InvalidExtension {
                name: name.to_string(),
                extension: extension.clone(),
            }),
            other => other,
        }
    }
}

impl fmt::Debug for HttpResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResolver")
            .field("ignore_discovery_errors", &self.ignore_discovery_errors)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for HttpResolver {
    async fn resolve(&self, name: &str) -> Result<Arc<Entries>> {
        let mut visited = HashSet::new();
        let entries = self.resolve_entries(&mut visited, name).await?;
        debug!(name, count = entries.len(), "resolved namespace");
        Ok(Arc::new(entries))
    }
}
