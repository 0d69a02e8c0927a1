//! # Signpost Core
//!
//! Core value types for the signpost namespace discovery resolver.
//!
//! A [`Scope`] names a point in a hierarchical namespace
//! (`example.com/project`); an [`Entry`] binds a scope to a routing
//! [`Action`] (`pull`, `push`, `index`, `namespace`) with free-form
//! arguments; [`Entries`] keeps entries ordered and duplicate-free so that
//! results merged from several discovery origins stay deterministic.
//!
//! ## Example
//!
//! ```
//! use signpost_core::{Action, Entries, Entry, Scope};
//!
//! let scope = Scope::parse("example.com")?;
//! let mut entries = Entries::new();
//! entries.add(Entry::new(
//!     scope.clone(),
//!     Action::Pull,
//!     vec!["https://registry.example.com/v1/".into(), "version=1.0".into()],
//! ))?;
//!
//! assert!(scope.contains("example.com/library/bar"));
//! assert_eq!(
//!     entries.to_string(),
//!     "example.com pull https://registry.example.com/v1/ version=1.0\n"
//! );
//! # Ok::<(), signpost_core::Error>(())
//! ```

pub mod entries;
pub mod entry;
pub mod error;
pub mod scope;

#[cfg(test)]
mod proptest_tests;

pub use entries::Entries;
pub use entry::{Action, Entry};
pub use error::{Error, Result};
pub use scope::Scope;
