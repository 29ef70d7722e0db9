//! BatchDisaggregator - one publish task per record, origin order preserved

use contracts::{ContractError, DecodedPayload, PublishTask, TopicPath};

/// Flatten a decoded payload into publish tasks bound to `topic`.
///
/// `Single` yields one task at index 0; `Batch` yields one task per element
/// with index equal to its position in the request.
///
/// # Errors
/// `ContractError::System` for `Handshake`, which is answered before this
/// stage and never carries records.
pub fn disaggregate(
    payload: DecodedPayload,
    topic: &TopicPath,
) -> Result<Vec<PublishTask>, ContractError> {
    match payload {
        DecodedPayload::Handshake => Err(ContractError::System(
            "handshake reached the disaggregation stage".to_string(),
        )),
        DecodedPayload::Single(record) => Ok(vec![PublishTask {
            index: 0,
            topic: topic.clone(),
            record,
        }]),
        DecodedPayload::Batch(records) => Ok(records
            .into_iter()
            .enumerate()
            .map(|(index, record)| PublishTask {
                index,
                topic: topic.clone(),
                record,
            })
            .collect()),
    }
}
