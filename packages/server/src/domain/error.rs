//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Errors raised by a `FormRepository` implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Form '{0}' not found")]
    FormNotFound(String),

    #[error("Form '{0}' already exists")]
    DuplicateForm(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while pushing a payload to a live connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Connection to client '{0}' is closed")]
    ChannelClosed(String),

    #[error("Send to client '{0}' timed out")]
    Timeout(String),
}
