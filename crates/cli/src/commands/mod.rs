//! Command implementations.

mod ingest;
mod serve;
mod validate;

pub use ingest::run_ingest;
pub use serve::run_serve;
pub use validate::run_validate;

use std::sync::Arc;

use contracts::GatewayConfig;
use dispatcher::{create_publisher, BrokerPublisher, PublishCoordinator};
use gateway::Gateway;

use crate::error::Result;

/// Create the process-wide publisher and wrap it in a gateway
fn build_gateway(config: &GatewayConfig) -> Result<Arc<Gateway<BrokerPublisher>>> {
    let publisher = create_publisher(&config.broker)?;
    let coordinator = PublishCoordinator::new(publisher);
    Ok(Arc::new(Gateway::new(
        coordinator,
        config.topic_path(),
        config.publish.mode,
    )))
}
