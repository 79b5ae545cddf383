//! Running tally of a reconciliation run

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::reconciliation::bucket::{BankEntry, SystemEntry};
use crate::types::ReconciliationReport;

/// Mutable aggregate owned by the engine while a run is in progress
#[derive(Debug, Default)]
pub struct ReportAccumulator {
    matched_count: usize,
    unmatched_count: usize,
    system_unmatched_ids: Vec<String>,
    bank_unmatched_by_bank: BTreeMap<String, Vec<String>>,
    total_unmatched_amount: BigDecimal,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `pairs` system/bank pairs as matched
    pub fn record_matched(&mut self, pairs: usize) {
        self.matched_count += pairs;
    }

    /// Record a system entry with no bank counterpart
    ///
    /// The ledger amount is used, never the sign-adjusted bucket key.
    pub fn record_system_unmatched(&mut self, entry: &SystemEntry) {
        self.unmatched_count += 1;
        self.system_unmatched_ids.push(entry.id.clone());
        self.total_unmatched_amount += &entry.amount;
    }

    /// Record a bank entry with no system counterpart
    ///
    /// The amount is added as stored, in the bank's own sign convention.
    pub fn record_bank_unmatched(&mut self, entry: &BankEntry) {
        self.unmatched_count += 1;
        self.bank_unmatched_by_bank
            .entry(entry.bank_id.clone())
            .or_default()
            .push(entry.id.clone());
        self.total_unmatched_amount += &entry.amount;
    }

    /// Freeze the tally into the report returned to the caller
    pub fn finish(self, start_date: NaiveDate, end_date: NaiveDate) -> ReconciliationReport {
        ReconciliationReport {
            start_date,
            end_date,
            success: true,
            matched_count: self.matched_count,
            unmatched_count: self.unmatched_count,
            total_processed: self.matched_count + self.unmatched_count,
            system_unmatched_ids: self.system_unmatched_ids,
            bank_unmatched_by_bank: self.bank_unmatched_by_bank,
            total_unmatched_amount: self.total_unmatched_amount,
        }
    }
}
