//! Publisher implementations
//!
//! Contains PubSubPublisher, LogPublisher, MockPublisher, and the
//! configuration-selected BrokerPublisher.

mod broker;
mod log;
mod mock;
mod pubsub;

pub use self::broker::{create_publisher, BrokerPublisher};
pub use self::log::LogPublisher;
pub use self::mock::MockPublisher;
pub use self::pubsub::{PubSubConfig, PubSubPublisher, DEFAULT_ENDPOINT};
