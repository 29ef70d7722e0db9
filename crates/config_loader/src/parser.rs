//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, GatewayConfig};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<GatewayConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<GatewayConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<GatewayConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{BrokerKind, PublishPolicy};

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[broker]
project_id = "my-project"
topic_id = "records"
kind = "log"
timeout_ms = 5000

[server]
host = "127.0.0.1"
port = 9090

[publish]
mode = "atomic"
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.broker.project_id, "my-project");
        assert_eq!(config.broker.kind, BrokerKind::Log);
        assert_eq!(config.broker.timeout_ms, 5000);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(config.publish.mode, PublishPolicy::Atomic);
    }

    #[test]
    fn test_parse_toml_empty_uses_defaults() {
        let config = parse_toml("").unwrap();
        assert!(config.broker.project_id.is_empty());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{ "broker": { "project_id": "p", "topic_id": "records" } }"#;
        let config = parse_json(content).unwrap();
        assert_eq!(config.broker.topic_id, "records");
        assert_eq!(config.publish.mode, PublishPolicy::BestEffort);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let result = parse_toml("invalid toml [[[");
        assert!(matches!(
            result.unwrap_err(),
            ContractError::ConfigParse { .. }
        ));
    }

    #[test]
    fn test_parse_unknown_mode_rejected() {
        let result = parse_toml("[publish]\nmode = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
