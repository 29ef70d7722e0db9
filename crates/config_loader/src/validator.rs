//! 配置校验模块
//!
//! 校验规则：
//! - project_id / topic_id 必填
//! - topic_id 符合 Pub/Sub 命名规则
//! - max_body_bytes > 0, timeout_ms > 0
//! - endpoint 必须是 http(s) URL

use contracts::{ContractError, GatewayConfig};

/// 校验 GatewayConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &GatewayConfig) -> Result<(), ContractError> {
    validate_project(config)?;
    validate_topic(config)?;
    validate_endpoint(config)?;
    validate_limits(config)?;
    Ok(())
}

/// 校验 project_id
fn validate_project(config: &GatewayConfig) -> Result<(), ContractError> {
    let project = config.broker.project_id.trim();
    if project.is_empty() {
        return Err(ContractError::config_validation(
            "broker.project_id",
            "project id is required (set GCP_PROJECT)",
        ));
    }
    if project.contains('/') {
        return Err(ContractError::config_validation(
            "broker.project_id",
            format!("project id '{project}' must not contain '/'"),
        ));
    }
    Ok(())
}

/// 校验 topic_id
fn validate_topic(config: &GatewayConfig) -> Result<(), ContractError> {
    let topic = config.broker.topic_id.as_str();
    if topic.trim().is_empty() {
        return Err(ContractError::config_validation(
            "broker.topic_id",
            "topic id is required (set PUBSUB_TOPIC)",
        ));
    }

    let invalid = |message: String| Err(ContractError::config_validation("broker.topic_id", message));

    if !(3..=255).contains(&topic.len()) {
        return invalid(format!("topic id '{topic}' must be 3-255 characters"));
    }
    if !topic.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return invalid(format!("topic id '{topic}' must start with a letter"));
    }
    if topic.starts_with("goog") {
        return invalid(format!("topic id '{topic}' must not start with 'goog'"));
    }
    if let Some(bad) = topic
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "-_.~+%".contains(*c)))
    {
        return invalid(format!("topic id '{topic}' contains invalid character '{bad}'"));
    }
    Ok(())
}

/// 校验 endpoint
fn validate_endpoint(config: &GatewayConfig) -> Result<(), ContractError> {
    if let Some(endpoint) = &config.broker.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ContractError::config_validation(
                "broker.endpoint",
                format!("endpoint '{endpoint}' must be an http(s) URL"),
            ));
        }
    }
    Ok(())
}

/// 校验数值限制
fn validate_limits(config: &GatewayConfig) -> Result<(), ContractError> {
    if config.server.max_body_bytes == 0 {
        return Err(ContractError::config_validation(
            "server.max_body_bytes",
            "max_body_bytes must be > 0",
        ));
    }
    if config.broker.timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "broker.timeout_ms",
            "timeout_ms must be > 0",
        ));
    }
    Ok(())
}
