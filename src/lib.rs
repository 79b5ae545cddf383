//! # Bank Reconciler
//!
//! Reconciles an application's own ledger ("system transactions") against one
//! or more bank statements over a date range.
//!
//! ## Features
//!
//! - **Bucket matching**: records are grouped by calendar date and signed amount;
//!   a system debit matches a negative bank amount, a credit a positive one
//! - **Deterministic reports**: surplus records are picked by ingestion order and
//!   amounts are visited in sorted order, so re-runs produce identical reports
//! - **Multiple banks**: unmatched bank records are reported per bank identifier
//! - **Concurrent ingestion**: all sources are loaded in parallel before matching
//! - **Source abstraction**: CSV files out of the box, anything else through
//!   the `RecordSource` trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bank_reconciler::{CsvSource, ReconcileRequest, Reconciler};
//! use chrono::NaiveDate;
//!
//! # async fn run() -> bank_reconciler::ReconcileResult<()> {
//! let request = ReconcileRequest::new(
//!     "system.csv",
//!     NaiveDate::from_ymd_opt(2025, 5, 25).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
//! )
//! .with_bank("BCA", "bank_a.csv")
//! .with_bank("BCB", "bank_b.csv");
//!
//! let report = Reconciler::new(CsvSource::new()).reconcile(&request).await?;
//! println!("{} matched, {} unmatched", report.matched_count, report.unmatched_count);
//! # Ok(())
//! # }
//! ```

pub mod ingest;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ingest::{CsvSource, MemorySource};
pub use reconciliation::{ReconciliationEngine, Reconciler};
pub use traits::*;
pub use types::*;
