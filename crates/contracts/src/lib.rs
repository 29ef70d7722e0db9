//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Request Model
//! - One request body decodes into exactly one `DecodedPayload`
//! - Every record becomes exactly one `PublishTask` and exactly one `IndexedOutcome`
//! - The origin index is the only ordering carried through the pipeline

mod error;
mod gateway_config;
mod outcome;
mod publisher;
mod record;
mod topic;

pub use error::*;
pub use gateway_config::*;
pub use outcome::*;
pub use publisher::{LocalPublisher, Publisher};
pub use record::*;
pub use topic::TopicPath;
