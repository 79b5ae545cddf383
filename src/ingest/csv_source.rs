//! CSV statement ingestion
//!
//! Files carry no header row. System rows are
//! `id,amount,debit|credit,YYYY-MM-DD HH:MM:SS` and bank rows are
//! `id,amount,YYYY-MM-DD`. The first row that fails to parse aborts the
//! whole file.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::traits::*;
use crate::types::*;

/// Timestamp layout of system rows
pub const SYSTEM_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date layout of bank rows
pub const BANK_DATE_FORMAT: &str = "%Y-%m-%d";

const SYSTEM_FIELDS: usize = 4;
const BANK_FIELDS: usize = 3;

fn parse_amount(field: &str) -> Result<BigDecimal, String> {
    BigDecimal::from_str(field).map_err(|e| format!("invalid amount {field:?}: {e}"))
}

/// Parse a system transaction row
pub fn parse_system_row(row: &StringRecord) -> Result<SystemRecord, String> {
    if row.len() != SYSTEM_FIELDS {
        return Err("wrong number of fields in row".to_string());
    }

    let amount = parse_amount(&row[1])?;
    let kind = TransactionKind::from_str(&row[2])?;
    let timestamp = NaiveDateTime::parse_from_str(&row[3], SYSTEM_TIMESTAMP_FORMAT)
        .map_err(|e| format!("invalid timestamp {:?}: {e}", &row[3]))?;

    Ok(SystemRecord::new(&row[0], amount, kind, timestamp))
}

/// Parse a bank statement row
pub fn parse_bank_row(row: &StringRecord) -> Result<BankRecord, String> {
    if row.len() != BANK_FIELDS {
        return Err("wrong number of fields in row".to_string());
    }

    let amount = parse_amount(&row[1])?;
    let date = NaiveDate::parse_from_str(&row[2], BANK_DATE_FORMAT)
        .map_err(|e| format!("invalid date {:?}: {e}", &row[2]))?;

    Ok(BankRecord::new(&row[0], amount, date))
}

/// Read every row from `reader`, converting each with `parse`
///
/// `path` is only used to label errors. Row numbers are zero-based.
pub fn read_records<T, R, F>(reader: R, path: &str, parse: F) -> ReconcileResult<Vec<T>>
where
    R: Read,
    F: Fn(&StringRecord) -> Result<T, String>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let fields = result.map_err(|err| {
            let reason = err.to_string();
            match err.into_kind() {
                csv::ErrorKind::Io(source) => ReconcileError::Io {
                    path: path.to_string(),
                    source,
                },
                _ => ReconcileError::Parse {
                    path: path.to_string(),
                    row,
                    reason,
                },
            }
        })?;

        let record = parse(&fields).map_err(|reason| ReconcileError::Parse {
            path: path.to_string(),
            row,
            reason,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Open `path` and read every row with `parse`
pub fn read_records_from_path<T, F>(path: &Path, parse: F) -> ReconcileResult<Vec<T>>
where
    F: Fn(&StringRecord) -> Result<T, String>,
{
    let label = path.display().to_string();
    let file = File::open(path).map_err(|source| ReconcileError::Io {
        path: label.clone(),
        source,
    })?;

    let records = read_records(io::BufReader::new(file), &label, parse)?;
    if records.is_empty() {
        warn!(path = %label, "source contains no records");
    } else {
        debug!(path = %label, records = records.len(), "parsed source");
    }
    Ok(records)
}

/// Record source reading CSV files from disk
///
/// Relative locations are resolved against the base directory when one is
/// configured.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    base_dir: Option<PathBuf>,
}

impl CsvSource {
    /// Create a source resolving locations relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source resolving relative locations against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Resolve a location to the file that will be opened
    pub fn resolve(&self, location: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        }
    }

    async fn load<T, F>(&self, location: &str, parse: F) -> ReconcileResult<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&StringRecord) -> Result<T, String> + Send + 'static,
    {
        let path = self.resolve(location);
        let label = path.display().to_string();
        tokio::task::spawn_blocking(move || read_records_from_path(&path, parse))
            .await
            .map_err(|e| ReconcileError::Io {
                path: label,
                source: io::Error::other(e),
            })?
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn load_system_records(&self, location: &str) -> ReconcileResult<Vec<SystemRecord>> {
        self.load(location, parse_system_row).await
    }

    async fn load_bank_records(&self, location: &str) -> ReconcileResult<Vec<BankRecord>> {
        self.load(location, parse_bank_row).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_system_row() {
        let record =
            parse_system_row(&row(&["sys1", "120.50", "debit", "2025-05-25 14:03:09"])).unwrap();
        assert_eq!(record.id, "sys1");
        assert_eq!(record.amount, BigDecimal::from_str("120.5").unwrap());
        assert_eq!(record.kind, TransactionKind::Debit);
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2025, 5, 25).unwrap());
    }

    #[test]
    fn test_system_row_rejections() {
        let cases = [
            vec!["sys1", "1", "debit"],
            vec!["sys1", "abc", "debit", "2025-05-25 14:03:09"],
            vec!["sys1", "1", "refund", "2025-05-25 14:03:09"],
            vec!["sys1", "1", "credit", "2025-05-25"],
            vec!["sys1", "1", "credit", "2025-05-25T14:03:09"],
        ];
        for case in cases {
            assert!(parse_system_row(&row(&case)).is_err(), "{case:?} should fail");
        }
    }

    #[test]
    fn test_parse_bank_row() {
        let record = parse_bank_row(&row(&["bankA_1", "-75.00", "2025-05-26"])).unwrap();
        assert_eq!(record.amount, BigDecimal::from(-75));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 5, 26).unwrap());

        assert!(parse_bank_row(&row(&["bankA_1", "-75.00"])).is_err());
        assert!(parse_bank_row(&row(&["bankA_1", "-75.00", "2025-05-26 00:00:00"])).is_err());
        assert!(parse_bank_row(&row(&["bankA_1", "", "2025-05-26"])).is_err());
    }

    #[test]
    fn test_read_records_reports_offending_row() {
        let data = "b1,10,2025-05-25\nb2,11,2025-05-25\nb3,oops,2025-05-25\n";
        let err = read_records(data.as_bytes(), "bank.csv", parse_bank_row).unwrap_err();
        match err {
            ReconcileError::Parse { path, row, .. } => {
                assert_eq!(path, "bank.csv");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_records_keeps_file_order() {
        let data = "s2,5,credit,2025-05-25 10:00:00\ns1,5,credit,2025-05-25 09:00:00\n";
        let records = read_records(data.as_bytes(), "system.csv", parse_system_row).unwrap();
        assert_eq!(
            records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["s2", "s1"]
        );
    }

    #[test]
    fn test_read_records_accepts_closure_parser() {
        let data = "b1,10,2025-05-25\nb2,-4.5,2025-05-26\n";
        let bank_id = "BCA".to_string();
        let tagged = read_records(data.as_bytes(), "bank.csv", move |fields| {
            parse_bank_row(fields).map(|record| (bank_id.clone(), record))
        })
        .unwrap();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[1].0, "BCA");
        assert_eq!(tagged[1].1.amount, BigDecimal::from_str("-4.5").unwrap());

        let err = read_records(data.as_bytes(), "bank.csv", |fields: &StringRecord| {
            if &fields[0] == "b2" {
                Err("rejected".to_string())
            } else {
                parse_bank_row(fields)
            }
        })
        .unwrap_err();
        assert!(matches!(err, ReconcileError::Parse { row: 1, .. }));
    }

    #[test]
    fn test_resolve_against_base_dir() {
        let source = CsvSource::with_base_dir("/data/run");
        assert_eq!(source.resolve("bank.csv"), PathBuf::from("/data/run/bank.csv"));
        assert_eq!(CsvSource::new().resolve("bank.csv"), PathBuf::from("bank.csv"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = CsvSource::new()
            .load_bank_records("/definitely/not/here.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Io { .. }));
    }
}
