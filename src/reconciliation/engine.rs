//! Day-by-day reconciliation of system buckets against bank buckets

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::reconciliation::bucket::{BankEntry, BucketIndex, DayBuckets, SystemEntry};
use crate::reconciliation::report::ReportAccumulator;
use crate::types::*;

/// Walks a closed date range and compares both bucket indexes day by day
///
/// When a bucket holds more records on one side than the other, the surplus is
/// taken from the front of the larger bucket. Several records sharing a date
/// and amount cannot be told apart, so this choice only guarantees that two
/// runs over the same input report the same ids.
#[derive(Debug, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Reconcile every day in `[start_date, end_date]`
    ///
    /// Both indexes are consumed: each day's buckets are removed as the day is
    /// processed. Records dated outside the range are never visited.
    pub fn reconcile(
        &self,
        mut system: BucketIndex<SystemEntry>,
        mut bank: BucketIndex<BankEntry>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ReconcileResult<ReconciliationReport> {
        if end_date < start_date {
            return Err(ReconcileError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        info!(%start_date, %end_date, "starting reconciliation");

        let mut acc = ReportAccumulator::new();
        for date in start_date.iter_days().take_while(|date| *date <= end_date) {
            self.reconcile_day(
                date,
                system.take_day(date),
                bank.take_day(date),
                &mut acc,
            );
        }

        let report = acc.finish(start_date, end_date);
        info!(
            matched = report.matched_count,
            unmatched = report.unmatched_count,
            total_unmatched_amount = %report.total_unmatched_amount,
            "reconciliation finished"
        );
        Ok(report)
    }

    fn reconcile_day(
        &self,
        date: NaiveDate,
        system_day: DayBuckets<SystemEntry>,
        mut bank_day: DayBuckets<BankEntry>,
        acc: &mut ReportAccumulator,
    ) {
        for (amount, system_entries) in system_day {
            // Removing the bank bucket marks it consumed for the sweep below.
            let bank_entries = bank_day.remove(&amount).unwrap_or_default();

            if bank_entries.len() > system_entries.len() {
                let surplus = bank_entries.len() - system_entries.len();
                debug!(%date, %amount, surplus, "bank records missing from system");
                acc.record_matched(system_entries.len());
                for entry in &bank_entries[..surplus] {
                    acc.record_bank_unmatched(entry);
                }
            } else if bank_entries.len() < system_entries.len() {
                let surplus = system_entries.len() - bank_entries.len();
                debug!(%date, %amount, surplus, "system records missing from bank");
                acc.record_matched(bank_entries.len());
                for entry in &system_entries[..surplus] {
                    acc.record_system_unmatched(entry);
                }
            } else {
                acc.record_matched(system_entries.len());
            }
        }

        // Whatever is left had no system bucket with the same amount.
        for (amount, bank_entries) in bank_day {
            debug!(
                %date,
                %amount,
                count = bank_entries.len(),
                "bank bucket has no system counterpart"
            );
            for entry in &bank_entries {
                acc.record_bank_unmatched(entry);
            }
        }
    }
}
