//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use contracts::{BrokerKind, ContractError, GatewayConfig, PublishPolicy};

/// Webhook Gateway - accept webhook batches and publish every record to a broker topic
#[derive(Parser, Debug)]
#[command(
    name = "webhook-gateway",
    author,
    version,
    about = "Webhook ingestion gateway",
    long_about = "Accepts webhook deliveries (handshake, single record or batch), publishes\n\
                  every record to the configured topic concurrently, and answers with one\n\
                  aggregated response."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "GATEWAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "GATEWAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP ingestion server
    Serve(ServeArgs),

    /// Validate configuration without running
    Validate(ValidateArgs),

    /// Run one payload through the full pipeline and print the reply
    Ingest(IngestArgs),
}

/// Configuration sources shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Optional configuration file (TOML or JSON); environment overrides it
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override project id
    #[arg(long)]
    pub project: Option<String>,

    /// Override topic id
    #[arg(long)]
    pub topic: Option<String>,

    /// Override broker kind
    #[arg(long, value_enum)]
    pub broker: Option<BrokerArg>,

    /// Override publish mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

impl ConfigArgs {
    /// Load file + environment, then apply command-line overrides
    pub fn load(&self) -> Result<GatewayConfig, ContractError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(&self, lookup: F) -> Result<GatewayConfig, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Required identifiers may come from flags only, so they join the lookup
        let project = self.project.clone();
        let topic = self.topic.clone();
        let merged = move |key: &str| match key {
            config_loader::env::ENV_PROJECT if project.is_some() => project.clone(),
            config_loader::env::ENV_TOPIC if topic.is_some() => topic.clone(),
            _ => lookup(key),
        };
        let mut config = config_loader::ConfigLoader::load_with_env(self.config.as_deref(), merged)?;
        if let Some(broker) = self.broker {
            config.broker.kind = broker.into();
        }
        if let Some(mode) = self.mode {
            config.publish.mode = mode.into();
        }
        Ok(config)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override listen host
    #[arg(long)]
    pub host: Option<String>,

    /// Override listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "GATEWAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `ingest` command
#[derive(Parser, Debug)]
pub struct IngestArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Payload file ("-" or omitted reads stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Broker kind flag
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BrokerArg {
    Pubsub,
    Log,
}

impl From<BrokerArg> for BrokerKind {
    fn from(arg: BrokerArg) -> Self {
        match arg {
            BrokerArg::Pubsub => Self::Pubsub,
            BrokerArg::Log => Self::Log,
        }
    }
}

/// Publish mode flag
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    BestEffort,
    Atomic,
}

impl From<ModeArg> for PublishPolicy {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::BestEffort => Self::BestEffort,
            ModeArg::Atomic => Self::Atomic,
        }
    }
}
