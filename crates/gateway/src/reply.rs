//! IngestReply - the (status, body) pair returned for every request

use contracts::{BatchResult, ContractError, FailedRecord, MessageId, PublishPolicy};
use serde::Serialize;
use serde_json::Value;

pub const HANDSHAKE_TEXT: &str = "Endpoint verified";
pub const INTERNAL_MESSAGE: &str = "internal error while processing request";

/// Terminal classification of a request (metrics label)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Handshake,
    Rejected,
    Published,
    Partial,
    Failed,
    Internal,
}

impl ReplyOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Handshake => "handshake",
            Self::Rejected => "rejected",
            Self::Published => "published",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Internal => "internal",
        }
    }
}

/// Response body
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Text(String),
    Json(Value),
}

/// Transport-independent response of the ingest pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReply {
    pub status: u16,
    pub outcome: ReplyOutcome,
    pub body: ReplyBody,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    kind: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
}

#[derive(Serialize)]
struct Summary<'a> {
    status: &'static str,
    total: usize,
    published: usize,
    failed: usize,
    message_ids: &'a [MessageId],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    failures: &'a [FailedRecord],
}

impl IngestReply {
    /// Empty body acknowledgement; nothing was published
    pub fn handshake() -> Self {
        Self {
            status: 200,
            outcome: ReplyOutcome::Handshake,
            body: ReplyBody::Text(HANDSHAKE_TEXT.to_string()),
        }
    }

    /// 400 for decode / validation errors
    pub fn rejected(error: &ContractError) -> Self {
        let (kind, index) = match error {
            ContractError::Validation { index, .. } => ("validation", *index),
            _ => ("decode", None),
        };
        let envelope = ErrorEnvelope {
            error: ErrorDetail {
                kind,
                message: error.to_string(),
                index,
            },
        };
        Self::json(400, ReplyOutcome::Rejected, &envelope)
    }

    /// Summary of a publish attempt.
    ///
    /// Best effort: 200 unless nothing at all was published.
    /// Atomic: 500 on any failure.
    pub fn from_batch(result: &BatchResult, policy: PublishPolicy) -> Self {
        let (status, outcome) = if result.all_published() {
            (200, ReplyOutcome::Published)
        } else if result.is_partial() && policy == PublishPolicy::BestEffort {
            (200, ReplyOutcome::Partial)
        } else {
            (500, ReplyOutcome::Failed)
        };

        let summary = Summary {
            status: outcome.as_str(),
            total: result.total,
            published: result.succeeded,
            failed: result.failed(),
            message_ids: &result.message_ids,
            failures: &result.failures,
        };
        Self::json(status, outcome, &summary)
    }

    /// Generic 500; internal detail stays in the logs
    pub fn internal() -> Self {
        let envelope = ErrorEnvelope {
            error: ErrorDetail {
                kind: "internal",
                message: INTERNAL_MESSAGE.to_string(),
                index: None,
            },
        };
        Self::json(500, ReplyOutcome::Internal, &envelope)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Render the body as a string
    pub fn body_text(&self) -> String {
        match &self.body {
            ReplyBody::Text(text) => text.clone(),
            ReplyBody::Json(value) => value.to_string(),
        }
    }

    fn json<T: Serialize>(status: u16, outcome: ReplyOutcome, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                outcome,
                body: ReplyBody::Json(value),
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to render reply body");
                Self {
                    status: 500,
                    outcome: ReplyOutcome::Internal,
                    body: ReplyBody::Text(INTERNAL_MESSAGE.to_string()),
                }
            }
        }
    }
}
