//! Single routing directives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scope::Scope;

/// Routing directive kind.
///
/// The variant order is the sort rank used by [`Entries`](crate::Entries):
/// `namespace`, `index`, `pull`, `push`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Delegation of resolution to other scopes.
    Namespace,
    /// A search/index endpoint.
    Index,
    /// A registry endpoint serving pulls.
    Pull,
    /// A registry endpoint accepting pushes.
    Push,
}

impl Action {
    /// The action's wire word.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Index => "index",
            Self::Pull => "pull",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "namespace" => Ok(Self::Namespace),
            "index" => Ok(Self::Index),
            "pull" => Ok(Self::Pull),
            "push" => Ok(Self::Push),
            other => Err(Error::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

/// A single routing directive for a scope.
///
/// For `pull`, `push` and `index` the first argument is the endpoint URL
/// and the remaining arguments are free-form flags preserved verbatim
/// (`version=1.0`, `trim`). For `namespace` the arguments are namespace
/// names and may be empty.
///
/// Entries are immutable once constructed. The derived ordering is
/// `(scope, action rank, args)`, which is the iteration order of
/// [`Entries`](crate::Entries).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entry {
    scope: Scope,
    action: Action,
    args: Vec<String>,
}

impl Entry {
    /// Creates an entry.
    #[must_use]
    pub fn new(scope: Scope, action: Action, args: Vec<String>) -> Self {
        Self {
            scope,
            action,
            args,
        }
    }

    /// The scope this directive applies to.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The directive kind.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// All arguments, verbatim.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The endpoint URL, for URL-carrying actions.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self.action {
            Action::Namespace => None,
            Action::Index | Action::Pull | Action::Push => self.args.first().map(String::as_str),
        }
    }

    /// Free-form flags following the endpoint URL.
    #[must_use]
    pub fn flags(&self) -> &[String] {
        match self.action {
            Action::Namespace => &[],
            Action::Index | Action::Pull | Action::Push => self.args.get(1..).unwrap_or(&[]),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.scope, self.action)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl FromStr for Entry {
    type Err = Error;

    /// Parses one line of the textual form; lenient about whitespace runs.
    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let scope = tokens.next().ok_or_else(|| Error::InvalidEntry {
            line: line.to_string(),
            reason: "missing scope".to_string(),
        })?;
        let action = tokens.next().ok_or_else(|| Error::InvalidEntry {
            line: line.to_string(),
            reason: "missing action".to_string(),
        })?;
        Ok(Self::new(
            Scope::parse(scope)?,
            action.parse()?,
            tokens.map(String::from).collect(),
        ))
    }
}
