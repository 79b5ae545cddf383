//! bank-reconciler entry point.
//!
//! Builds a request from flags or a JSON file, runs the reconciliation over
//! CSV sources and prints the report. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context};
use bank_reconciler::{CsvSource, ReconcileRequest, ReconciliationReport, Reconciler};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "bank-reconciler",
    version,
    about = "Reconcile system transactions against bank statements"
)]
struct Cli {
    /// JSON file holding a full reconcile request
    #[arg(long, conflicts_with_all = ["system", "banks", "start", "end"])]
    request: Option<PathBuf>,

    /// System transaction CSV
    #[arg(long)]
    system: Option<String>,

    /// Bank statement CSV as BANK_ID=PATH; repeat for each bank
    #[arg(long = "bank", value_name = "BANK_ID=PATH", value_parser = parse_bank_source)]
    banks: Vec<(String, String)>,

    /// First day, YYYY-MM-DD or YYYY-MM-DD HH:MM:SS
    #[arg(long, value_parser = parse_bound)]
    start: Option<NaiveDateTime>,

    /// Last day (inclusive), YYYY-MM-DD or YYYY-MM-DD HH:MM:SS
    #[arg(long, value_parser = parse_bound)]
    end: Option<NaiveDateTime>,

    /// Directory relative source paths are resolved against
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_bank_source(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(bank, path)| (bank.to_string(), path.to_string()))
        .ok_or_else(|| format!("expected BANK_ID=PATH, got {value:?}"))
}

fn parse_bound(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|e| format!("invalid date {value:?}: {e}"))
}

fn build_request(cli: &Cli) -> anyhow::Result<ReconcileRequest> {
    if let Some(path) = &cli.request {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("could not read request file {}", path.display()))?;
        return Ok(ReconcileRequest::from_json(&json)?);
    }

    let (Some(system), Some(start), Some(end)) = (&cli.system, cli.start, cli.end) else {
        bail!("either --request or all of --system, --start and --end are required");
    };

    Ok(ReconcileRequest {
        system_source: system.clone(),
        bank_sources: cli.banks.iter().cloned().collect(),
        start,
        end,
    })
}

fn print_summary(report: &ReconciliationReport) {
    println!(
        "Reconciliation Summary ({} to {})",
        report.start_date, report.end_date
    );
    println!("------------------------------");
    println!("Total Processed Transactions : {}", report.total_processed);
    println!("Matched Transactions         : {}", report.matched_count);
    println!("Unmatched Transactions       : {}", report.unmatched_count);
    println!("Total Unmatched Amount       : {}", report.total_unmatched_amount);

    if !report.system_unmatched_ids.is_empty() {
        println!();
        println!("System Unmatched Transactions:");
        for id in &report.system_unmatched_ids {
            println!("  - {id}");
        }
    }

    if !report.bank_unmatched_by_bank.is_empty() {
        println!();
        println!("Bank Unmatched Transactions:");
        for (bank, ids) in &report.bank_unmatched_by_bank {
            println!("  Bank: {bank}");
            for id in ids {
                println!("    - {id}");
            }
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let request = build_request(&cli)?;

    let source = match &cli.base_dir {
        Some(dir) => CsvSource::with_base_dir(dir),
        None => CsvSource::new(),
    };
    info!(
        system = %request.system_source,
        banks = request.bank_sources.len(),
        "reconciling"
    );

    let report = Reconciler::new(source)
        .reconcile(&request)
        .await
        .context("reconciliation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_build_request() {
        let cli = Cli::parse_from([
            "bank-reconciler",
            "--system",
            "system.csv",
            "--bank",
            "BCA=bank_a.csv",
            "--bank",
            "BCB=bank_b.csv",
            "--start",
            "2025-05-25",
            "--end",
            "2025-05-30 00:00:00",
        ]);
        let request = build_request(&cli).unwrap();
        assert_eq!(request.bank_sources.len(), 2);
        assert_eq!(request.bank_sources["BCB"], "bank_b.csv");
        assert_eq!(request.end.date(), NaiveDate::from_ymd_opt(2025, 5, 30).unwrap());
    }

    #[test]
    fn test_non_midnight_bound_survives_parsing() {
        // rejected later by request validation, not silently truncated here
        let bound = parse_bound("2025-05-25 10:00:00").unwrap();
        assert_ne!(bound.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_missing_flags_are_reported() {
        let cli = Cli::parse_from(["bank-reconciler", "--system", "system.csv"]);
        assert!(build_request(&cli).is_err());
        assert!(parse_bank_source("no-separator").is_err());
    }
}
