//! Layered error definitions
//!
//! Categorized by source: config / request / broker / system

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Request Errors =====
    /// Body is not valid JSON
    #[error("payload is not valid JSON: {message}")]
    Decode {
        message: String,
        /// Original payload, lossily decoded as UTF-8
        payload: String,
    },

    /// Body is valid JSON but not an object or an array of objects
    #[error("{}", validation_message(.index, .found))]
    Validation {
        /// Batch position of the offending element (None for top level)
        index: Option<usize>,
        /// JSON type that was found instead of an object
        found: String,
        /// Rendered offending value
        value: String,
    },

    // ===== Broker Errors =====
    /// A single publish failed
    #[error("publisher '{publisher}' failed: {message}")]
    Publish { publisher: String, message: String },

    /// Broker capability is not usable at all
    #[error("broker unavailable: {message}")]
    BrokerUnavailable { message: String },

    // ===== System Errors =====
    /// Outcomes do not line up with submitted tasks
    #[error("aggregation fault: {message}")]
    Aggregation { message: String },

    /// Any other internal fault
    #[error("internal error: {0}")]
    System(String),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn validation_message(index: &Option<usize>, found: &str) -> String {
    match index {
        Some(index) => format!("batch element {index} must be a JSON object, found {found}"),
        None => format!("payload must be a JSON object or an array of objects, found {found}"),
    }
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create decode error, keeping the original payload for diagnostics
    pub fn decode(message: impl Into<String>, payload: &[u8]) -> Self {
        Self::Decode {
            message: message.into(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        }
    }

    /// Create shape validation error
    pub fn validation(
        index: Option<usize>,
        found: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            index,
            found: found.into(),
            value: value.into(),
        }
    }

    /// Create publish error
    pub fn publish(publisher: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            publisher: publisher.into(),
            message: message.into(),
        }
    }

    /// Create broker unavailable error
    pub fn broker_unavailable(message: impl Into<String>) -> Self {
        Self::BrokerUnavailable {
            message: message.into(),
        }
    }

    /// Create aggregation fault
    pub fn aggregation(message: impl Into<String>) -> Self {
        Self::Aggregation {
            message: message.into(),
        }
    }

    /// Whether the caller must fix the request (maps to 400)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Validation { .. })
    }
}
