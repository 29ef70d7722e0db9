//! RequestDecoder - classify and shape-check a raw request body

use contracts::{ContractError, DecodedPayload, Record};
use serde_json::Value;
use tracing::{debug, instrument};

/// Longest rendering of an offending value kept in a validation error
const MAX_VALUE_PREVIEW: usize = 256;

/// Decode a raw body into a `DecodedPayload`.
///
/// - zero-length → `Handshake`, checked before any parsing
/// - JSON object → `Single`
/// - JSON array whose elements are all objects → `Batch` (may be empty)
///
/// # Errors
/// - `ContractError::Decode` if the body is not valid JSON
/// - `ContractError::Validation` for a non-object batch element (first one,
///   by index) or a top-level value that is neither object nor array
#[instrument(name = "request_decode", skip(raw), fields(bytes = raw.len()))]
pub fn decode(raw: &[u8]) -> Result<DecodedPayload, ContractError> {
    if raw.is_empty() {
        return Ok(DecodedPayload::Handshake);
    }

    let value: Value =
        serde_json::from_slice(raw).map_err(|e| ContractError::decode(e.to_string(), raw))?;

    let payload = match value {
        Value::Object(fields) => DecodedPayload::Single(Record::new(fields)),
        Value::Array(items) => DecodedPayload::Batch(into_records(items)?),
        other => {
            return Err(ContractError::validation(
                None,
                json_type(&other),
                preview(&other),
            ))
        }
    };

    debug!(kind = payload.kind(), records = payload.record_count(), "Payload decoded");
    Ok(payload)
}

fn into_records(items: Vec<Value>) -> Result<Vec<Record>, ContractError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(Record::new(fields)),
            other => Err(ContractError::validation(
                Some(index),
                json_type(&other),
                preview(&other),
            )),
        })
        .collect()
}

/// JSON type name used in validation messages
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(value: &Value) -> String {
    let mut rendered = value.to_string();
    if rendered.len() > MAX_VALUE_PREVIEW {
        let mut cut = MAX_VALUE_PREVIEW;
        while !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    rendered
}
