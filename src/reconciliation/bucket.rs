//! Bucket indexing of system and bank records by date and signed amount

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::types::*;

/// System record as held in a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct SystemEntry {
    pub id: String,
    /// Ledger amount before sign adjustment
    pub amount: BigDecimal,
}

/// Bank record as held in a bucket, tagged with its source bank
#[derive(Debug, Clone, PartialEq)]
pub struct BankEntry {
    pub id: String,
    pub bank_id: String,
    pub amount: BigDecimal,
}

/// Buckets for a single calendar day, keyed by signed amount
pub type DayBuckets<E> = BTreeMap<BigDecimal, Vec<E>>;

/// Two-level ordered index: date -> signed amount -> entries in ingestion order
///
/// Both levels are ordered maps so that walking a day visits amounts in
/// ascending numeric order on every run. Keys are normalized, which makes
/// `100`, `100.0` and `100.00` the same bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketIndex<E> {
    days: BTreeMap<NaiveDate, DayBuckets<E>>,
}

impl<E> BucketIndex<E> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    /// Append an entry to the bucket for `(date, signed_amount)`
    pub fn insert(&mut self, date: NaiveDate, signed_amount: &BigDecimal, entry: E) {
        self.days
            .entry(date)
            .or_default()
            .entry(signed_amount.normalized())
            .or_default()
            .push(entry);
    }

    /// Entries for `(date, signed_amount)`, empty if the bucket does not exist
    pub fn bucket(&self, date: NaiveDate, signed_amount: &BigDecimal) -> &[E] {
        self.days
            .get(&date)
            .and_then(|day| day.get(&signed_amount.normalized()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Remove and return every bucket for `date`
    pub fn take_day(&mut self, date: NaiveDate) -> DayBuckets<E> {
        self.days.remove(&date).unwrap_or_default()
    }

    /// Dates that still hold at least one bucket, in chronological order
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    /// Total number of entries across all buckets
    pub fn len(&self) -> usize {
        self.days
            .values()
            .flat_map(|day| day.values())
            .map(Vec::len)
            .sum()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for BucketIndex<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bank-equivalent value of a system record
///
/// A debit leaves the account and shows up negated on the bank statement.
pub fn signed_amount(record: &SystemRecord) -> BigDecimal {
    match record.kind {
        TransactionKind::Credit => record.amount.clone(),
        TransactionKind::Debit => -record.amount.clone(),
    }
}

/// Bucket system records by timestamp date and signed amount
pub fn index_system_records<'a>(
    records: impl IntoIterator<Item = &'a SystemRecord>,
) -> BucketIndex<SystemEntry> {
    let mut index = BucketIndex::new();
    for record in records {
        index.insert(
            record.date(),
            &signed_amount(record),
            SystemEntry {
                id: record.id.clone(),
                amount: record.amount.clone(),
            },
        );
    }
    index
}

/// Bucket bank records from every source by date and amount as stored
///
/// Sources are merged in the order given; within a source, records keep their
/// statement order.
pub fn index_bank_records<'a>(
    sources: impl IntoIterator<Item = (&'a str, &'a [BankRecord])>,
) -> BucketIndex<BankEntry> {
    let mut index = BucketIndex::new();
    for (bank_id, records) in sources {
        for record in records {
            index.insert(
                record.date,
                &record.amount,
                BankEntry {
                    id: record.id.clone(),
                    bank_id: bank_id.to_string(),
                    amount: record.amount.clone(),
                },
            );
        }
    }
    index
}
