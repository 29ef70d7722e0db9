//! GatewayConfig - Config Loader output
//!
//! Broker target, HTTP listener and publish policy.

use serde::{Deserialize, Serialize};

use crate::TopicPath;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Broker target
    #[serde(default)]
    pub broker: BrokerConfig,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Publish policy
    #[serde(default)]
    pub publish: PublishConfig,
}

impl GatewayConfig {
    /// Topic every record of every request is published to
    pub fn topic_path(&self) -> TopicPath {
        TopicPath::new(&self.broker.project_id, &self.broker.topic_id)
    }
}

/// Broker client kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerKind {
    /// Google Cloud Pub/Sub REST API (or its emulator)
    #[default]
    Pubsub,
    /// Log records instead of publishing (local development)
    Log,
}

impl BrokerKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pubsub" => Some(Self::Pubsub),
            "log" => Some(Self::Log),
            _ => None,
        }
    }
}

/// Broker target and client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Project / namespace identifier (required)
    #[serde(default)]
    pub project_id: String,

    /// Topic identifier (required)
    #[serde(default)]
    pub topic_id: String,

    /// Client kind
    #[serde(default)]
    pub kind: BrokerKind,

    /// API base URL override (emulator, private endpoint)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// OAuth bearer token
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    /// Per-publish timeout enforced by the broker client
    #[serde(default = "default_publish_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_publish_timeout_ms() -> u64 {
    30_000
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            topic_id: String::new(),
            kind: BrokerKind::default(),
            endpoint: None,
            access_token: None,
            timeout_ms: default_publish_timeout_ms(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Requests with larger bodies are rejected with 413 before decoding
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// How per-record publish failures affect the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishPolicy {
    /// Publish every valid record, report failures per index (200)
    #[default]
    BestEffort,
    /// Any failed record fails the whole request (500)
    Atomic,
}

impl PublishPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "best_effort" => Some(Self::BestEffort),
            "atomic" => Some(Self::Atomic),
            _ => None,
        }
    }
}

/// Publish settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub mode: PublishPolicy,
}
