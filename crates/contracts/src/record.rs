//! Record / DecodedPayload / PublishTask - Decoder and disaggregator output
//!
//! A record is always a JSON object; arrays and scalars are rejected by the
//! decoder before a `Record` is ever constructed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::TopicPath;

/// One JSON object to be published as one broker message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap an already-validated JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the object has no fields (`{}` is still a valid record)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON encoding, field order as received.
    ///
    /// # Errors
    /// Returns the serializer error; callers turn it into a per-record failure.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Classified request body.
///
/// Produced once per request by the decoder and never re-inspected for
/// its JSON type further down the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    /// Zero-length body (liveness / verification handshake)
    Handshake,
    /// A single JSON object
    Single(Record),
    /// A JSON array of objects, in request order
    Batch(Vec<Record>),
}

impl DecodedPayload {
    /// Number of records that will be published
    pub fn record_count(&self) -> usize {
        match self {
            Self::Handshake => 0,
            Self::Single(_) => 1,
            Self::Batch(records) => records.len(),
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handshake => "handshake",
            Self::Single(_) => "single",
            Self::Batch(_) => "batch",
        }
    }
}

/// One record bound to its origin index and destination topic.
#[derive(Debug, Clone)]
pub struct PublishTask {
    /// Position in the original batch (0 for a single record)
    pub index: usize,
    /// Destination topic
    pub topic: TopicPath,
    /// Record to publish
    pub record: Record,
}
