//! `serve` command implementation.

use std::net::{IpAddr, SocketAddr};

use tracing::info;

use crate::cli::ServeArgs;
use crate::error::{CliError, Result};

/// Execute the `serve` command
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    let mut config = args.config.load()?;

    // Apply CLI overrides
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding listen host from CLI");
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port = port, "Overriding listen port from CLI");
        config.server.port = port;
    }

    let addr = listen_addr(&config.server.host, config.server.port)?;
    let gateway = super::build_gateway(&config)?;

    info!(
        topic = %gateway.topic(),
        publisher = gateway.publisher_name(),
        mode = ?config.publish.mode,
        max_body_bytes = config.server.max_body_bytes,
        "Configuration loaded"
    );

    gateway::start_server(gateway, addr, config.server.max_body_bytes).await?;
    Ok(())
}

fn listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host
        .parse()
        .map_err(|e: std::net::AddrParseError| CliError::listen_address(host, port, e.to_string()))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        let addr = listen_addr("0.0.0.0", 8080).unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(listen_addr("not-an-ip", 8080).is_err());
    }
}
