//! Traits for ingestion abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;
use crate::utils::validation;

/// Source of records for a reconciliation run
///
/// This trait lets the reconciler work with any backing store (CSV files,
/// in-memory fixtures, a database export, etc.). Every load is independent and
/// read-only, so the reconciler may run several loads concurrently.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every system record found at `location`, in source order
    async fn load_system_records(&self, location: &str) -> ReconcileResult<Vec<SystemRecord>>;

    /// Load every bank record found at `location`, in source order
    async fn load_bank_records(&self, location: &str) -> ReconcileResult<Vec<BankRecord>>;
}

/// Trait for implementing custom request validation rules
pub trait RequestValidator: Send + Sync {
    /// Validate a request before any source is read
    fn validate_request(&self, request: &ReconcileRequest) -> ReconcileResult<()>;

    /// Validate the loaded records before they are indexed
    fn validate_records(
        &self,
        system: &[SystemRecord],
        banks: &[(String, Vec<BankRecord>)],
    ) -> ReconcileResult<()>;
}

/// Default validator enforcing the input contract of a run
pub struct DefaultRequestValidator;

impl RequestValidator for DefaultRequestValidator {
    fn validate_request(&self, request: &ReconcileRequest) -> ReconcileResult<()> {
        validation::validate_range_bound("start date", &request.start)?;
        validation::validate_range_bound("end date", &request.end)?;
        validation::validate_date_order(&request.start, &request.end)?;
        validation::validate_source_location("system transaction", &request.system_source)?;
        validation::validate_bank_sources(&request.bank_sources)?;
        Ok(())
    }

    fn validate_records(
        &self,
        system: &[SystemRecord],
        banks: &[(String, Vec<BankRecord>)],
    ) -> ReconcileResult<()> {
        validation::validate_non_empty_records("system transaction", system.len())?;
        for (bank_id, records) in banks {
            validation::validate_non_empty_records(&format!("bank {bank_id}"), records.len())?;
        }
        validation::validate_unique_ids(
            "system transaction",
            system.iter().map(|record| record.id.as_str()),
        )?;
        validation::validate_unique_ids(
            "bank transaction",
            banks
                .iter()
                .flat_map(|(_, records)| records.iter().map(|record| record.id.as_str())),
        )?;
        Ok(())
    }
}
