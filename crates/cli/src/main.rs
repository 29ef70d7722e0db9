//! # Webhook Gateway CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - HTTP 接入服务 (`serve`)
//! - 配置加载与验证 (`validate`)
//! - 单次载荷处理 (`ingest`)

mod cli;
mod commands;
mod error;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_ingest, run_serve, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))
        .context("Failed to initialize observability")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Webhook gateway CLI starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Ingest(args) => run_ingest(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result.map_err(anyhow::Error::from)
}

/// Build observability settings from CLI options
fn observability_config(cli: &Cli) -> observability::ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let metrics_port = match &cli.command {
        Commands::Serve(args) if args.metrics_port != 0 => Some(args.metrics_port),
        _ => None,
    };

    observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port,
        default_log_level: default_log_level.to_string(),
        // stdout carries command output for everything but `serve`
        log_to_stderr: !matches!(cli.command, Commands::Serve(_)),
    }
}
