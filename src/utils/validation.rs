//! Validation utilities

use chrono::{NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, HashSet};

use crate::types::*;

/// Validate that a range bound carries no time-of-day component
pub fn validate_range_bound(label: &str, bound: &NaiveDateTime) -> ReconcileResult<()> {
    if bound.time() != NaiveTime::MIN {
        return Err(ReconcileError::InvalidInput(format!(
            "{label} is invalid: {bound} is not midnight"
        )));
    }
    Ok(())
}

/// Validate that the range does not run backwards
pub fn validate_date_order(start: &NaiveDateTime, end: &NaiveDateTime) -> ReconcileResult<()> {
    if end < start {
        return Err(ReconcileError::InvalidInput(format!(
            "end date {} is before start date {}",
            end.date(),
            start.date()
        )));
    }
    Ok(())
}

/// Validate that a source location is present
pub fn validate_source_location(label: &str, location: &str) -> ReconcileResult<()> {
    if location.trim().is_empty() {
        return Err(ReconcileError::InvalidInput(format!(
            "{label} source path is empty"
        )));
    }
    Ok(())
}

/// Validate the bank identifier to location mapping
pub fn validate_bank_sources(sources: &BTreeMap<String, String>) -> ReconcileResult<()> {
    if sources.is_empty() {
        return Err(ReconcileError::InvalidInput(
            "bank statement source paths are empty".to_string(),
        ));
    }

    for (bank_id, location) in sources {
        if bank_id.trim().is_empty() {
            return Err(ReconcileError::InvalidInput(
                "bank identifier cannot be empty".to_string(),
            ));
        }
        validate_source_location(&format!("bank {bank_id}"), location)?;
    }

    Ok(())
}

/// Validate that a loaded source produced at least one record
pub fn validate_non_empty_records(label: &str, count: usize) -> ReconcileResult<()> {
    if count == 0 {
        return Err(ReconcileError::InvalidInput(format!(
            "{label} source contains no records"
        )));
    }
    Ok(())
}

/// Validate that no identifier appears twice
pub fn validate_unique_ids<'a>(
    label: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> ReconcileResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ReconcileError::InvalidInput(format!(
                "duplicate {label} id '{id}'"
            )));
        }
    }
    Ok(())
}
