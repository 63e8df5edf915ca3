//! Error types for the episode details coordinator.
//!
//! Uses `thiserror` for the library error type; the binary layers `anyhow`
//! context on top.
//!
//! The coordinator itself never retries: interactor failures are surfaced as
//! [`EpisodeDetailsError::Interactor`] values, logged, and dropped.

use crate::domain::{EpisodeId, WatchId};
use thiserror::Error;

/// The main error type for episode details operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpisodeDetailsError {
    /// The coordinator has been shut down and its action queue is closed
    #[error("Coordinator is closed")]
    CoordinatorClosed,

    /// A bounded action queue rejected a submission
    #[error("Action queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// Construction was attempted outside a Tokio runtime
    #[error("No Tokio runtime available to spawn coordinator tasks")]
    NoRuntime,

    /// A data-access interactor reported a failure
    #[error("Interactor '{operation}' failed: {message}")]
    Interactor {
        operation: &'static str,
        message: String,
    },

    /// Episode is unknown to the data layer
    #[error("Episode not found: {id}")]
    EpisodeNotFound { id: EpisodeId },

    /// Watch entry is unknown to the data layer
    #[error("Watch entry not found: {id}")]
    WatchNotFound { id: WatchId },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for episode details operations.
pub type Result<T> = std::result::Result<T, EpisodeDetailsError>;

impl EpisodeDetailsError {
    /// Create an Interactor error for the named operation
    pub fn interactor(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Interactor {
            operation,
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
