//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files (optional)
//! - Overlay process environment (`GCP_PROJECT`, `PUBSUB_TOPIC`, ...)
//! - Validate configuration legality
//! - Generate `GatewayConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//!
//! let config = ConfigLoader::load(None).unwrap();
//! println!("Topic: {}", config.topic_path());
//! ```

pub mod env;
mod parser;
mod validator;

pub use contracts::GatewayConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files, strings and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file plus the process environment
    ///
    /// Environment variables override file values.
    pub fn load(path: Option<&Path>) -> Result<GatewayConfig, ContractError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigLoader::load`] with an injectable variable lookup
    ///
    /// # Errors
    /// - File read failure
    /// - Parse failure
    /// - Invalid environment value
    /// - Validation failure
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let format = Self::detect_format(path)?;
                parser::parse(&Self::read_file(path)?, format)?
            }
            None => GatewayConfig::default(),
        };
        env::apply(&mut config, lookup)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// The environment is not consulted.
    pub fn load_from_path(path: &Path) -> Result<GatewayConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<GatewayConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize GatewayConfig to TOML string
    ///
    /// The access token is never serialized.
    pub fn to_toml(config: &GatewayConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize GatewayConfig to JSON string
    pub fn to_json(config: &GatewayConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
