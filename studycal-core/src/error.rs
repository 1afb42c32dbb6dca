//! Error types for studycal.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in studycal operations.
#[derive(Error, Debug)]
pub enum StudyCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store rejected the request ({status}): {message}")]
    Store { status: u16, message: String },

    #[error("Store request timed out after {0:?}")]
    StoreTimeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Study records have not been loaded yet")]
    NotLoaded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for studycal operations.
pub type StudyCalResult<T> = Result<T, StudyCalError>;
