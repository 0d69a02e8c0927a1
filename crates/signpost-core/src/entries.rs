//! Ordered, duplicate-free collections of routing entries.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::{Error, Result};

/// An ordered, duplicate-free set of routing entries.
///
/// Iteration follows the sort key `(scope, action rank, args)` with actions
/// ranked `namespace`, `index`, `pull`, `push`, so merged results from
/// several discovery origins come out in one deterministic order. Two
/// entries are duplicates when they agree on all three components.
///
/// The textual form used by [`fmt::Display`] and [`FromStr`] is one entry
/// per line, whitespace-separated: `<scope> <action> <arg0> [<arg1> ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct Entries {
    entries: Vec<Entry>,
}

impl Entries {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an equal entry is present.
    #[must_use]
    pub fn contains(&self, entry: &Entry) -> bool {
        self.entries.binary_search(entry).is_ok()
    }

    /// Whether any entry's scope contains `name`.
    #[must_use]
    pub fn covers(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.scope().contains(name))
    }

    /// Inserts an entry, preserving sort order.
    ///
    /// Inserting an exact duplicate is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JoinConflict`] when the entry names an endpoint
    /// already present under the same scope and action but with different
    /// flags.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        match self.entries.binary_search(&entry) {
            Ok(_) => Ok(()),
            Err(pos) => {
                if let Some(url) = entry.url() {
                    if let Some(existing) = self.entries.iter().find(|e| {
                        e.scope() == entry.scope()
                            && e.action() == entry.action()
                            && e.url() == Some(url)
                    }) {
                        return Err(Error::JoinConflict {
                            existing: existing.to_string(),
                            candidate: entry.to_string(),
                        });
                    }
                }
                self.entries.insert(pos, entry);
                Ok(())
            }
        }
    }

    /// Removes the entry equal to `entry`, returning whether it was present.
    pub fn remove(&mut self, entry: &Entry) -> bool {
        match self.entries.binary_search(entry) {
            Ok(pos) => {
                self.entries.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Set-union with `other`.
    ///
    /// Commutative and associative up to the shared sort order: duplicates
    /// collapse, and conflicting endpoint flags fail exactly as in
    /// [`Entries::add`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::JoinConflict`] as described for [`Entries::add`].
    pub fn join(&self, other: &Self) -> Result<Self> {
        let mut joined = self.clone();
        for entry in &other.entries {
            joined.add(entry.clone())?;
        }
        Ok(joined)
    }

    /// Iterates over the entries in sort order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Reads the textual form from `reader`.
    ///
    /// Blank lines are skipped; each remaining line parses as one entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] when the reader fails, or the parse error of
    /// the first bad line.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(|source| Error::Read { source })?;
        buf.parse()
    }
}

impl fmt::Display for Entries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl FromStr for Entries {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut entries = Self::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            entries.add(line.parse()?)?;
        }
        Ok(entries)
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Entries> for Vec<Entry> {
    fn from(entries: Entries) -> Self {
        entries.entries
    }
}

impl TryFrom<Vec<Entry>> for Entries {
    type Error = Error;

    fn try_from(list: Vec<Entry>) -> Result<Self> {
        let mut entries = Self::new();
        for entry in list {
            entries.add(entry)?;
        }
        Ok(entries)
    }
}
