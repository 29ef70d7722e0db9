//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Publisher creation error
    #[error("failed to create publisher '{name}': {message}")]
    PublisherCreation { name: String, message: String },
}

impl DispatcherError {
    /// Create a publisher creation error
    pub fn publisher_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PublisherCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
