//! # Ingestion
//!
//! Request body decoding and batch disaggregation.
//!
//! Responsibilities:
//! - Classify a raw body as handshake, single record or batch
//! - Reject malformed or misshaped input before anything is published
//! - Turn decoded records into indexed `PublishTask`s
//!
//! ## Usage Example
//!
//! ```
//! use contracts::{DecodedPayload, TopicPath};
//! use ingestion::{decode, disaggregate};
//!
//! let topic = TopicPath::new("my-project", "records");
//! let payload = decode(br#"[{"id":1},{"id":2}]"#).unwrap();
//! assert!(matches!(payload, DecodedPayload::Batch(_)));
//!
//! let tasks = disaggregate(payload, &topic).unwrap();
//! assert_eq!(tasks[1].index, 1);
//! ```

mod decoder;
mod disaggregator;

// Re-exports
pub use contracts::{DecodedPayload, PublishTask};
pub use decoder::{decode, json_type};
pub use disaggregator::disaggregate;
