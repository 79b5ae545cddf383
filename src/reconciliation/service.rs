//! Reconciler that coordinates ingestion, indexing and the engine

use futures_util::future::{try_join, try_join_all};
use tracing::debug;

use crate::reconciliation::bucket::{index_bank_records, index_system_records};
use crate::reconciliation::engine::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Main entry point for running a reconciliation against a record source
pub struct Reconciler<S: RecordSource> {
    source: S,
    validator: Box<dyn RequestValidator>,
    engine: ReconciliationEngine,
}

impl<S: RecordSource> Reconciler<S> {
    /// Create a new reconciler reading from the given source
    pub fn new(source: S) -> Self {
        Self {
            source,
            validator: Box::new(DefaultRequestValidator),
            engine: ReconciliationEngine::new(),
        }
    }

    /// Create a new reconciler with a custom validator
    pub fn with_validator(source: S, validator: Box<dyn RequestValidator>) -> Self {
        Self {
            source,
            validator,
            engine: ReconciliationEngine::new(),
        }
    }

    /// Underlying record source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run a full reconciliation for the request
    ///
    /// The system source and every bank source are loaded concurrently. The
    /// first load error is returned as-is and no report is produced.
    pub async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> ReconcileResult<ReconciliationReport> {
        self.validator.validate_request(request)?;

        let (system, banks) = try_join(
            self.source.load_system_records(&request.system_source),
            try_join_all(request.bank_sources.iter().map(|(bank_id, location)| async move {
                let records = self.source.load_bank_records(location).await?;
                debug!(bank = %bank_id, records = records.len(), "loaded bank statement");
                Ok::<_, ReconcileError>((bank_id.clone(), records))
            })),
        )
        .await?;
        debug!(records = system.len(), "loaded system transactions");

        self.validator.validate_records(&system, &banks)?;

        let system_index = index_system_records(&system);
        let bank_index = index_bank_records(
            banks
                .iter()
                .map(|(bank_id, records)| (bank_id.as_str(), records.as_slice())),
        );

        self.engine.reconcile(
            system_index,
            bank_index,
            request.start.date(),
            request.end.date(),
        )
    }
}
