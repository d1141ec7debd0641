//! Error types for the Roster Server
//!
//! This module contains the error types used at startup. Request-time
//! failures never become a `ServerError`; they are GraphQL field errors.

use thiserror::Error;

use roster_graph::DirectoryError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Seed file error
    #[error("Data file error: {0}")]
    DataFileError(String),

    /// Socket error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl From<DirectoryError> for ServerError {
    fn from(err: DirectoryError) -> Self {
        ServerError::DataFileError(err.to_string())
    }
}
