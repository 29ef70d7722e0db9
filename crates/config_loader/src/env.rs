//! 环境变量覆盖模块
//!
//! Applies process environment on top of file/default configuration.

use contracts::{BrokerKind, ContractError, GatewayConfig, PublishPolicy};

pub const ENV_PROJECT: &str = "GCP_PROJECT";
pub const ENV_PROJECT_FALLBACK: &str = "GOOGLE_CLOUD_PROJECT";
pub const ENV_TOPIC: &str = "PUBSUB_TOPIC";
pub const ENV_BROKER: &str = "GATEWAY_BROKER";
pub const ENV_ENDPOINT: &str = "PUBSUB_ENDPOINT";
pub const ENV_EMULATOR_HOST: &str = "PUBSUB_EMULATOR_HOST";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const ENV_PUBLISH_TIMEOUT_MS: &str = "GATEWAY_PUBLISH_TIMEOUT_MS";
pub const ENV_HOST: &str = "GATEWAY_HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MAX_BODY_BYTES: &str = "GATEWAY_MAX_BODY_BYTES";
pub const ENV_PUBLISH_MODE: &str = "GATEWAY_PUBLISH_MODE";

/// Apply environment overrides.
///
/// `lookup` returns the value of a variable; empty values count as unset.
/// The emulator host wins over an explicit endpoint and disables auth.
pub fn apply<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ContractError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(project) = get(ENV_PROJECT).or_else(|| get(ENV_PROJECT_FALLBACK)) {
        config.broker.project_id = project;
    }
    if let Some(topic) = get(ENV_TOPIC) {
        config.broker.topic_id = topic;
    }
    if let Some(kind) = get(ENV_BROKER) {
        config.broker.kind = BrokerKind::parse(&kind).ok_or_else(|| {
            ContractError::config_validation(ENV_BROKER, format!("unknown broker kind '{kind}'"))
        })?;
    }
    if let Some(endpoint) = get(ENV_ENDPOINT) {
        config.broker.endpoint = Some(endpoint);
    }
    if let Some(token) = get(ENV_ACCESS_TOKEN) {
        config.broker.access_token = Some(token);
    }
    if let Some(host) = get(ENV_EMULATOR_HOST) {
        config.broker.endpoint = Some(format!("http://{host}"));
        config.broker.access_token = None;
    }
    if let Some(timeout) = get(ENV_PUBLISH_TIMEOUT_MS) {
        config.broker.timeout_ms = parse_number(ENV_PUBLISH_TIMEOUT_MS, &timeout)?;
    }
    if let Some(host) = get(ENV_HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(ENV_PORT) {
        config.server.port = parse_number(ENV_PORT, &port)?;
    }
    if let Some(limit) = get(ENV_MAX_BODY_BYTES) {
        config.server.max_body_bytes = parse_number(ENV_MAX_BODY_BYTES, &limit)?;
    }
    if let Some(mode) = get(ENV_PUBLISH_MODE) {
        config.publish.mode = PublishPolicy::parse(&mode).ok_or_else(|| {
            ContractError::config_validation(
                ENV_PUBLISH_MODE,
                format!("unknown publish mode '{mode}', expected best_effort or atomic"),
            )
        })?;
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ContractError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ContractError::config_validation(key, format!("invalid value '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_required_identifiers() {
        let mut config = GatewayConfig::default();
        apply(
            &mut config,
            lookup(&[(ENV_PROJECT, "proj"), (ENV_TOPIC, "records")]),
        )
        .unwrap();
        assert_eq!(config.broker.project_id, "proj");
        assert_eq!(config.broker.topic_id, "records");
    }

    #[test]
    fn test_project_fallback() {
        let mut config = GatewayConfig::default();
        apply(&mut config, lookup(&[(ENV_PROJECT_FALLBACK, "other")])).unwrap();
        assert_eq!(config.broker.project_id, "other");
    }

    #[test]
    fn test_empty_value_is_unset() {
        let mut config = GatewayConfig::default();
        config.broker.topic_id = "from-file".to_string();
        apply(&mut config, lookup(&[(ENV_TOPIC, "  ")])).unwrap();
        assert_eq!(config.broker.topic_id, "from-file");
    }

    #[test]
    fn test_emulator_overrides_endpoint_and_token() {
        let mut config = GatewayConfig::default();
        apply(
            &mut config,
            lookup(&[
                (ENV_ENDPOINT, "https://example.test"),
                (ENV_ACCESS_TOKEN, "secret"),
                (ENV_EMULATOR_HOST, "localhost:8085"),
            ]),
        )
        .unwrap();
        assert_eq!(
            config.broker.endpoint.as_deref(),
            Some("http://localhost:8085")
        );
        assert!(config.broker.access_token.is_none());
    }

    #[test]
    fn test_numeric_and_enum_overrides() {
        let mut config = GatewayConfig::default();
        apply(
            &mut config,
            lookup(&[
                (ENV_PORT, "9000"),
                (ENV_MAX_BODY_BYTES, "1024"),
                (ENV_PUBLISH_TIMEOUT_MS, "250"),
                (ENV_PUBLISH_MODE, "atomic"),
                (ENV_BROKER, "log"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_body_bytes, 1024);
        assert_eq!(config.broker.timeout_ms, 250);
        assert_eq!(config.publish.mode, PublishPolicy::Atomic);
        assert_eq!(config.broker.kind, BrokerKind::Log);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = GatewayConfig::default();
        let err = apply(&mut config, lookup(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let mut config = GatewayConfig::default();
        let err = apply(&mut config, lookup(&[(ENV_PUBLISH_MODE, "yolo")])).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }
}
