//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Direction of a ledger transaction as recorded by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money leaving the account; appears negated on the bank side
    Debit,
    /// Money entering the account; appears unchanged on the bank side
    Credit,
}

impl TransactionKind {
    /// Literal used in system CSV rows
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(TransactionKind::Debit),
            "credit" => Ok(TransactionKind::Credit),
            other => Err(format!("invalid transaction type: {other:?}")),
        }
    }
}

/// A transaction from the application's own ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    /// Unique identifier of the transaction
    pub id: String,
    /// Amount exactly as recorded by the ledger
    pub amount: BigDecimal,
    /// Debit or credit
    pub kind: TransactionKind,
    /// When the transaction was recorded
    pub timestamp: NaiveDateTime,
}

impl SystemRecord {
    /// Create a new system record
    pub fn new(
        id: impl Into<String>,
        amount: BigDecimal,
        kind: TransactionKind,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            kind,
            timestamp,
        }
    }

    /// Calendar date the record is bucketed under
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// A line from a bank statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    /// Unique identifier, unique across all bank sources of a run
    pub id: String,
    /// Amount in the bank's own sign convention
    pub amount: BigDecimal,
    /// Booking date
    pub date: NaiveDate,
}

impl BankRecord {
    /// Create a new bank record
    pub fn new(id: impl Into<String>, amount: BigDecimal, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            amount,
            date,
        }
    }
}

/// Parameters of a single reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Location of the system transaction source
    pub system_source: String,
    /// Bank identifier to bank statement location
    pub bank_sources: BTreeMap<String, String>,
    /// First day of the range; must be exactly midnight
    pub start: NaiveDateTime,
    /// Last day of the range (inclusive); must be exactly midnight
    pub end: NaiveDateTime,
}

impl ReconcileRequest {
    /// Create a request covering whole days from `start` to `end`
    pub fn new(system_source: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            system_source: system_source.into(),
            bank_sources: BTreeMap::new(),
            start: start.and_time(chrono::NaiveTime::MIN),
            end: end.and_time(chrono::NaiveTime::MIN),
        }
    }

    /// Add a bank statement source
    pub fn with_bank(mut self, bank_id: impl Into<String>, location: impl Into<String>) -> Self {
        self.bank_sources.insert(bank_id.into(), location.into());
        self
    }

    /// Load a request from a JSON document
    pub fn from_json(json: &str) -> ReconcileResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReconcileError::InvalidInput(format!("malformed request: {e}")))
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// First reconciled day
    pub start_date: NaiveDate,
    /// Last reconciled day
    pub end_date: NaiveDate,
    /// Always true on a returned report
    pub success: bool,
    /// System/bank pairs consumed together
    pub matched_count: usize,
    /// Records left without a counterpart on either side
    pub unmatched_count: usize,
    /// `matched_count + unmatched_count`
    pub total_processed: usize,
    /// System records missing from every bank statement
    pub system_unmatched_ids: Vec<String>,
    /// Bank records missing from the ledger, grouped by bank identifier
    pub bank_unmatched_by_bank: BTreeMap<String, Vec<String>>,
    /// Sum of every unmatched record's amount: the ledger amount for system
    /// records, the stored amount for bank records
    pub total_unmatched_amount: BigDecimal,
}

impl ReconciliationReport {
    /// Number of ids across the system and bank unmatched lists
    pub fn unmatched_record_count(&self) -> usize {
        self.system_unmatched_ids.len()
            + self
                .bank_unmatched_by_bank
                .values()
                .map(Vec::len)
                .sum::<usize>()
    }

    /// Whether both sides agree completely for the range
    pub fn is_clean(&self) -> bool {
        self.unmatched_count == 0
    }
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid range: end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Parse error in {path} at row {row}: {reason}")]
    Parse {
        path: String,
        row: usize,
        reason: String,
    },
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
