//! ResultAggregator - fan-in outcomes into one BatchResult

use contracts::{BatchResult, ContractError, FailedRecord, IndexedOutcome, Outcome};

/// Combine the outcomes of one request into a `BatchResult`.
///
/// Every index in `0..total` must appear exactly once. Message ids and
/// failures come back in origin-index order whatever order the outcomes
/// arrive in.
pub fn aggregate(
    total: usize,
    outcomes: Vec<IndexedOutcome>,
) -> Result<BatchResult, ContractError> {
    if outcomes.len() != total {
        return Err(ContractError::aggregation(format!(
            "expected {total} outcomes, got {}",
            outcomes.len()
        )));
    }

    let mut slots: Vec<Option<Outcome>> = vec![None; total];
    for IndexedOutcome { index, outcome } in outcomes {
        let slot = slots.get_mut(index).ok_or_else(|| {
            ContractError::aggregation(format!(
                "outcome index {index} out of range for {total} records"
            ))
        })?;
        if slot.replace(outcome).is_some() {
            return Err(ContractError::aggregation(format!(
                "duplicate outcome for index {index}"
            )));
        }
    }

    let mut result = BatchResult {
        total,
        ..BatchResult::default()
    };
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Outcome::Published(id)) => {
                result.succeeded += 1;
                result.message_ids.push(id);
            }
            Some(Outcome::Failed(error)) => result.failures.push(FailedRecord { index, error }),
            None => {
                return Err(ContractError::aggregation(format!(
                    "missing outcome for index {index}"
                )))
            }
        }
    }

    Ok(result)
}
