//! Error types for schedule-host.
//!
//! Access outcomes (an unreadable or missing record) are not errors; see
//! [`crate::store::Access`].

use thiserror::Error;

/// Errors that can occur in schedule-host operations.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HostError {
    /// Configuration and storage faults abort the current request; everything
    /// else is a problem with the caller's input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HostError::Config(_) | HostError::Storage(_) | HostError::Io(_)
        )
    }
}

/// Result type alias for schedule-host operations.
pub type HostResult<T> = Result<T, HostError>;
