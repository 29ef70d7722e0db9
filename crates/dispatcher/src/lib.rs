//! # Dispatcher
//!
//! 发布分发模块。
//!
//! 负责：
//! - 每条记录一个发布任务，全部并发提交 (fan-out)
//! - 等待所有任务完成后统一返回 (fan-in)
//! - 单条失败只影响自身结果，不影响其他任务

pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod publishers;

pub use contracts::{Publisher, PublishTask};
pub use coordinator::PublishCoordinator;
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, PublishMetrics};
pub use publishers::{
    create_publisher, BrokerPublisher, LogPublisher, MockPublisher, PubSubConfig, PubSubPublisher,
};
