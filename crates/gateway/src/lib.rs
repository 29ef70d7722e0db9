//! # Gateway
//!
//! Webhook 接入网关：请求解码 → 拆分 → 并发发布 → 汇总响应。
//!
//! ## 请求状态机
//!
//! `Decoding → {Handshake | Rejected | Disaggregating} → Publishing → Aggregating → Responded`
//!
//! 每个请求都以唯一的 `IngestReply` 结束。
//!
//! ## 使用示例
//!
//! ```ignore
//! use std::sync::Arc;
//! use gateway::{create_router, Gateway};
//!
//! let gateway = Gateway::new(coordinator, config.topic_path(), config.publish.mode);
//! let app = create_router(Arc::new(gateway), config.server.max_body_bytes);
//! ```

pub mod aggregator;
pub mod pipeline;
pub mod reply;
pub mod server;

pub use aggregator::aggregate;
pub use pipeline::Gateway;
pub use reply::{IngestReply, ReplyBody, ReplyOutcome};
pub use server::{create_router, start_server, HealthResponse, RequestId, REQUEST_ID_HEADER};
