//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Failed to load configuration: {0}")]
    Config(#[from] contracts::ContractError),

    /// Broker client could not be created
    #[error("Failed to initialize broker publisher: {0}")]
    BrokerInit(#[from] dispatcher::DispatcherError),

    /// Listen address is not a valid socket address
    #[error("Invalid listen address {host}:{port}: {message}")]
    ListenAddress {
        host: String,
        port: u16,
        message: String,
    },

    /// Payload input could not be read
    #[error("Failed to read payload from {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline answered with a non-success status
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn listen_address(host: impl Into<String>, port: u16, message: impl Into<String>) -> Self {
        Self::ListenAddress {
            host: host.into(),
            port,
            message: message.into(),
        }
    }

    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
