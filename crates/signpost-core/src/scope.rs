//! Hierarchical namespace scopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A hierarchical namespace identifier.
///
/// A scope is a non-empty `/`-delimited path whose smallest unit is a host,
/// such as `example.com` or `example.com/project`. Scopes are plain values:
/// cheap to clone, compared and ordered by their string form.
///
/// # Examples
///
/// ```
/// use signpost_core::Scope;
///
/// let scope = Scope::parse("example.com/project")?;
/// assert!(scope.contains("example.com/project/main"));
/// assert!(!scope.contains("example.com/other"));
/// # Ok::<(), signpost_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Scope(String);

impl Scope {
    /// Parses a scope string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScope`] when the trimmed string is empty,
    /// starts or ends with `/`, contains an empty path segment, or carries
    /// embedded whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let reject = |reason: &str| Error::InvalidScope {
            scope: s.to_string(),
            reason: reason.to_string(),
        };
        if trimmed.is_empty() {
            return Err(reject("empty"));
        }
        if trimmed.starts_with('/') || trimmed.ends_with('/') {
            return Err(reject("leading or trailing '/'"));
        }
        if trimmed.split('/').any(str::is_empty) {
            return Err(reject("empty path segment"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(reject("embedded whitespace"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns `true` when `name` equals this scope or sits below it.
    ///
    /// Containment respects `/` boundaries: `example.com` contains
    /// `example.com/app` but not `example.community`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match name.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// The scope as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}
