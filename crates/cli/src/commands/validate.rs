//! `validate` command implementation.

use serde::Serialize;
use tracing::info;

use contracts::{BrokerKind, GatewayConfig};

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    topic: String,
    broker: BrokerKind,
    endpoint: Option<String>,
    listen: String,
    max_body_bytes: usize,
    publish_mode: contracts::PublishPolicy,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = ?args.config.config_path(), "Validating configuration");

    let loaded = args.config.load();
    let result = validation_result(args, &loaded);

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize validation result"),
        }
    } else {
        print_validation_result(&result);
    }

    loaded.map(|_| ()).map_err(CliError::from)
}

fn validation_result(
    args: &ValidateArgs,
    loaded: &std::result::Result<GatewayConfig, contracts::ContractError>,
) -> ValidationResult {
    let config_path = args.config.config_path().map(|p| p.display().to_string());

    match loaded {
        Ok(config) => {
            let warnings = collect_warnings(config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    topic: config.topic_path().to_string(),
                    broker: config.broker.kind,
                    endpoint: config.broker.endpoint.clone(),
                    listen: format!("{}:{}", config.server.host, config.server.port),
                    max_body_bytes: config.server.max_body_bytes,
                    publish_mode: config.publish.mode,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &GatewayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.broker.kind == BrokerKind::Log {
        warnings.push("Broker kind is 'log' - records are logged, not published".to_string());
    }

    if config.broker.kind == BrokerKind::Pubsub
        && config.broker.endpoint.is_none()
        && config.broker.access_token.is_none()
    {
        warnings.push(
            "No access token configured - requests to the Pub/Sub API will be unauthenticated"
                .to_string(),
        );
    }

    if let Some(endpoint) = &config.broker.endpoint {
        if endpoint.starts_with("http://") && config.broker.access_token.is_some() {
            warnings.push("Access token is sent over plain http".to_string());
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    let source = result.config_path.as_deref().unwrap_or("<environment>");
    if result.valid {
        println!("✓ Configuration is valid: {source}");

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Topic: {}", summary.topic);
            println!("  Broker: {:?}", summary.broker);
            if let Some(ref endpoint) = summary.endpoint {
                println!("  Endpoint: {endpoint}");
            }
            println!("  Listen: {}", summary.listen);
            println!("  Max body: {} bytes", summary.max_body_bytes);
            println!("  Publish mode: {:?}", summary.publish_mode);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Configuration is invalid: {source}");
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
