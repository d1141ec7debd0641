//! Error types for the Roster graph layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a `GraphStore` implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not hand out a connection
    #[error("Graph database connection error: {0}")]
    Connection(String),

    /// The statement could not be prepared or executed
    #[error("Graph query error: {0}")]
    Query(String),

    /// A returned row could not be read
    #[error("Graph row error: {0}")]
    Row(String),
}

/// Errors raised while turning a generic record into a typed one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing field `{field}` in {entity} record")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("field `{field}` in {entity} record has type {found}, expected {expected}")]
    WrongType {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors surfaced by `PersonClient` to resolvers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Person not found: id={id}")]
    NotFound { id: String },

    #[error("Invalid person identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Graph database unavailable: {0}")]
    Unavailable(String),

    #[error("Graph database call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Graph query failed: {0}")]
    Query(String),

    #[error("Could not decode person record: {0}")]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Stable machine-readable code, used in GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "NOT_FOUND",
            FetchError::InvalidIdentifier(_) => "BAD_USER_INPUT",
            FetchError::Unavailable(_) => "UPSTREAM_UNAVAILABLE",
            FetchError::Timeout { .. } => "UPSTREAM_TIMEOUT",
            FetchError::Query(_) => "UPSTREAM_QUERY_FAILED",
            FetchError::Decode(_) => "DECODE_FAILED",
        }
    }

    /// True for failures caused by the database being unreachable or slow
    pub fn is_upstream(&self) -> bool {
        matches!(self, FetchError::Unavailable(_) | FetchError::Timeout { .. })
    }
}

/// Errors raised when loading the static user directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_codes() {
        assert_eq!(FetchError::NotFound { id: "1".into() }.code(), "NOT_FOUND");
        assert_eq!(FetchError::InvalidIdentifier("x".into()).code(), "BAD_USER_INPUT");
        assert_eq!(FetchError::Timeout { timeout_ms: 5 }.code(), "UPSTREAM_TIMEOUT");

        assert!(FetchError::Unavailable("down".into()).is_upstream());
        assert!(!FetchError::Query("syntax".into()).is_upstream());
    }

    #[test]
    fn test_decode_error_message_names_field() {
        let err = DecodeError::WrongType {
            entity: "Person",
            field: "name",
            expected: "string",
            found: "number",
        };
        assert_eq!(
            err.to_string(),
            "field `name` in Person record has type number, expected string"
        );
    }
}
