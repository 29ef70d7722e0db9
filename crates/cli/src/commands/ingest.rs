//! `ingest` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::IngestArgs;
use crate::error::{CliError, Result};

/// Execute the `ingest` command
///
/// Prints the status line and body exactly as the HTTP endpoint would answer.
pub async fn run_ingest(args: &IngestArgs) -> Result<()> {
    let config = args.config.load()?;
    let payload = read_payload(args.input.as_deref())?;
    let gateway = super::build_gateway(&config)?;

    info!(
        bytes = payload.len(),
        topic = %gateway.topic(),
        publisher = gateway.publisher_name(),
        "Ingesting payload"
    );

    let reply = gateway.ingest(&payload).await;

    println!("{}", reply.status);
    println!("{}", reply.body_text());

    if reply.is_success() {
        Ok(())
    } else {
        Err(CliError::RequestFailed {
            status: reply.status,
        })
    }
}

/// Read the payload from a file, or stdin for `-` / no path
fn read_payload(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).map_err(|e| CliError::input(path, e))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| CliError::input(PathBuf::from("<stdin>"), e))?;
            Ok(buf)
        }
    }
}
