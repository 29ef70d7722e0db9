//! PubSubPublisher - Google Cloud Pub/Sub REST client
//!
//! One `topics.publish` call per record. The shared `reqwest::Client` pools
//! connections and is safe for concurrent use.
//!
//! A broker that refuses connections yields `BrokerUnavailable`; every other
//! failure is a `Publish` error for that record.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use contracts::{BrokerConfig, ContractError, MessageId, Publisher, TopicPath};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::DispatcherError;

/// Public Pub/Sub API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://pubsub.googleapis.com";

/// Longest broker error body kept in a failure detail
const MAX_ERROR_BODY: usize = 512;

/// Configuration for PubSubPublisher
#[derive(Debug, Clone)]
pub struct PubSubConfig {
    /// API base URL, without trailing slash
    pub endpoint: String,
    /// OAuth bearer token (None for the emulator)
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl PubSubConfig {
    /// Build from broker configuration
    pub fn from_broker(config: &BrokerConfig) -> Self {
        let endpoint = config
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string();

        Self {
            endpoint,
            access_token: config.access_token.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    messages: [PubsubMessage<'a>; 1],
}

#[derive(Serialize)]
struct PubsubMessage<'a> {
    data: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

/// Publisher backed by the Pub/Sub REST API
pub struct PubSubPublisher {
    name: String,
    config: PubSubConfig,
    base_url: reqwest::Url,
    client: reqwest::Client,
}

impl PubSubPublisher {
    /// Create a new PubSubPublisher
    ///
    /// # Errors
    /// Returns `DispatcherError::PublisherCreation` if the endpoint is not a
    /// base URL or the HTTP client cannot be built.
    pub fn new(name: impl Into<String>, config: PubSubConfig) -> Result<Self, DispatcherError> {
        let name = name.into();
        let base_url = reqwest::Url::parse(&config.endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                DispatcherError::publisher_creation(
                    &name,
                    format!("invalid endpoint '{}'", config.endpoint),
                )
            })?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("webhook-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DispatcherError::publisher_creation(&name, e.to_string()))?;

        debug!(
            publisher = %name,
            endpoint = %config.endpoint,
            authenticated = config.access_token.is_some(),
            "PubSubPublisher created"
        );

        Ok(Self {
            name,
            config,
            base_url,
            client,
        })
    }

    /// `{endpoint}/v1/projects/{project}/topics/{topic}:publish`, each
    /// segment percent-encoded (`%` in a topic id becomes `%25`)
    fn publish_url(&self, topic: &TopicPath) -> Result<reqwest::Url, ContractError> {
        let mut url = self.base_url.clone();
        let resource = format!("{}:publish", topic.topic_id());
        url.path_segments_mut()
            .map_err(|()| self.failure("endpoint cannot carry a path"))?
            .pop_if_empty()
            .push("v1")
            .extend(topic.as_str().split('/').take(3))
            .push(&resource);
        Ok(url)
    }

    fn failure(&self, message: impl Into<String>) -> ContractError {
        ContractError::publish(&self.name, message)
    }
}

impl Publisher for PubSubPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "pubsub_publish",
        skip(self, payload),
        fields(publisher = %self.name, topic = %topic, bytes = payload.len())
    )]
    async fn publish(&self, topic: &TopicPath, payload: Bytes) -> Result<MessageId, ContractError> {
        let data = STANDARD.encode(&payload);
        let body = PublishRequest {
            messages: [PubsubMessage { data: &data }],
        };

        let mut request = self.client.post(self.publish_url(topic)?).json(&body);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ContractError::broker_unavailable(format!("{}: {e}", self.config.endpoint))
                } else {
                    self.failure(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut text = response.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(self.failure(format!("broker returned {status}: {text}")));
        }

        let parsed: PublishResponse = response
            .json()
            .await
            .map_err(|e| self.failure(format!("invalid publish response: {e}")))?;

        parsed
            .message_ids
            .into_iter()
            .next()
            .map(MessageId::from)
            .ok_or_else(|| self.failure("publish response carried no message id"))
    }
}
