//! Error types for discovery operations.

use signpost_core::Scope;
use thiserror::Error;

/// Result type alias using [`DiscoveryError`] as the error type.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors produced while discovering and resolving a namespace.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Invalid scope, entry conflict or another core value error.
    #[error("{0}")]
    Core(#[from] signpost_core::Error),

    /// The response body is not even the expected HTML subset.
    #[error("malformed discovery document: {reason}")]
    MalformedDocument {
        /// What the tokenizer choked on.
        reason: String,
    },

    /// An element other than `head` or `meta` appeared.
    #[error("unexpected html element {element:?}")]
    UnexpectedElement {
        /// The offending element name.
        element: String,
    },

    /// A meta tag carried an attribute other than `name` or `content`.
    #[error("unrecognized meta tag attribute {attribute:?}")]
    UnknownAttribute {
        /// The offending attribute name.
        attribute: String,
    },

    /// A meta tag's `name=` is not one of the `docker-*` names.
    #[error("unsupported meta tag name={name:?}")]
    UnsupportedMetaName {
        /// The offending meta tag name.
        name: String,
    },

    /// A meta tag broke the attribute arity rules.
    #[error("malformed meta tag: {reason}")]
    MalformedMetaTag {
        /// What is wrong with the tag.
        reason: String,
    },

    /// A meta tag that requires `content=` lacked it.
    #[error("meta tag {tag} is missing content")]
    MissingContent {
        /// The meta tag name.
        tag: String,
    },

    /// Two `docker-scope` tags appeared in one document.
    #[error("multiple scopes defined: {first} and {second}")]
    MultipleScopes {
        /// The scope declared first.
        first: Scope,
        /// The scope declared second.
        second: Scope,
    },

    /// The document contained no usable routing entries.
    #[error("no entries found")]
    NoEntries,

    /// The default HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The transport failed before any HTTP status was received.
    #[error("discovery request for {name:?} failed: {message}")]
    Transport {
        /// The name being discovered.
        name: String,
        /// Transport failure description.
        message: String,
    },

    /// The discovery endpoint answered outside the 2xx range.
    #[error("discovery endpoint {name:?} replied with status {status}")]
    Http {
        /// The name being discovered.
        name: String,
        /// HTTP status code.
        status: u16,
    },

    /// Recursion was requested into an extension that does not cover the name.
    #[error("invalid extension: {extension} does not serve an ancestor scope of {name:?}")]
    InvalidExtension {
        /// The name being resolved.
        name: String,
        /// The rejected extension scope.
        extension: Scope,
    },

    /// A strict resolver was queried with a name outside its entries' scopes.
    #[error("no entries match {name:?}")]
    NoMatch {
        /// The unmatched name.
        name: String,
    },

    /// A resolver chain ran out of recursion budget.
    #[error("resolver recursion budget exhausted while resolving {name:?}")]
    DepthExhausted {
        /// The name being resolved.
        name: String,
    },
}
