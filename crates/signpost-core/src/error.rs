//! Error types for core entry operations.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or combining routing entries.
#[derive(Error, Debug)]
pub enum Error {
    /// A scope string failed validation.
    #[error("invalid scope {scope:?}: {reason}")]
    InvalidScope {
        /// The rejected scope string.
        scope: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An action word is not one of the known routing actions.
    #[error("unknown action {action:?}")]
    UnknownAction {
        /// The rejected action word.
        action: String,
    },

    /// A line of the textual entry format could not be parsed.
    #[error("invalid entry line {line:?}: {reason}")]
    InvalidEntry {
        /// The offending line.
        line: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two entries name the same endpoint but disagree on its flags.
    #[error("conflicting entries for one endpoint: {existing} vs {candidate}")]
    JoinConflict {
        /// Textual form of the entry already present.
        existing: String,
        /// Textual form of the entry being inserted.
        candidate: String,
    },

    /// Reading a textual entries stream failed.
    #[error("failed to read entries: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_scope() {
        let err = Error::InvalidScope {
            scope: "/bad".to_string(),
            reason: "leading or trailing '/'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid scope \"/bad\": leading or trailing '/'"
        );
    }

    #[test]
    fn test_error_display_unknown_action() {
        let err = Error::UnknownAction {
            action: "fetch".to_string(),
        };
        assert_eq!(err.to_string(), "unknown action \"fetch\"");
    }

    #[test]
    fn test_error_display_join_conflict() {
        let err = Error::JoinConflict {
            existing: "example.com pull https://a/ trim".to_string(),
            candidate: "example.com pull https://a/".to_string(),
        };
        assert!(err.to_string().contains("conflicting entries"));
    }
}
