//! # crossdock-reports: CSV Export Layer
//!
//! Serializes the simulation's flat records to CSV files so runs can be
//! analyzed later with spreadsheet tools or pandas.
//!
//! ## Export Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Report Exports                                   │
//! │                                                                         │
//! │  Scanner.item_logs()  ──► export_item_logs     ──► item_logs.csv       │
//! │  Scanner.row_logs()   ──► export_row_logs      ──► row_logs.csv        │
//! │  Truck.rows_status()  ──► export_rows_status   ──► rows_status.csv     │
//! │  Truck.summary()      ──► export_truck_summary ──► summary.csv (1 row) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - The CSV header is derived from the record struct's field set; the
//!   schema is defined once, in `crossdock-core`
//! - An empty input sequence is a no-op (no file created), never an error
//! - Parent directories are created as needed

pub mod error;

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crossdock_core::{ItemLogEntry, RowLogEntry, RowStatus, TruckSummary};

pub use error::{ReportError, ReportResult};

// =============================================================================
// Generic CSV Writer
// =============================================================================

/// Ensures the parent directory of `path` exists.
fn ensure_parent_dir(path: &Path) -> ReportResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Writes records to `path` as CSV, header included.
///
/// The caller guarantees `records` is non-empty; the public wrappers enforce
/// the empty-input no-op.
fn write_csv<T: Serialize>(records: &[T], path: &Path) -> ReportResult<()> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!(count = records.len(), path = %path.display(), "Exported CSV report");
    Ok(())
}

// =============================================================================
// Typed Exports
// =============================================================================

/// Exports the scanner's per-item logs. No-op when empty.
pub fn export_item_logs(item_logs: &[ItemLogEntry], path: impl AsRef<Path>) -> ReportResult<()> {
    if item_logs.is_empty() {
        return Ok(());
    }
    write_csv(item_logs, path.as_ref())
}

/// Exports the scanner's row creation logs. No-op when empty.
pub fn export_row_logs(row_logs: &[RowLogEntry], path: impl AsRef<Path>) -> ReportResult<()> {
    if row_logs.is_empty() {
        return Ok(());
    }
    write_csv(row_logs, path.as_ref())
}

/// Exports a truck's per-row strap status. No-op when empty.
pub fn export_rows_status(rows_status: &[RowStatus], path: impl AsRef<Path>) -> ReportResult<()> {
    if rows_status.is_empty() {
        return Ok(());
    }
    write_csv(rows_status, path.as_ref())
}

/// Exports a single truck summary as a one-row CSV.
pub fn export_truck_summary(summary: &TruckSummary, path: impl AsRef<Path>) -> ReportResult<()> {
    write_csv(std::slice::from_ref(summary), path.as_ref())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossdock_core::{Item, ItemType, Row, Truck};

    fn pallet(suffix: &str) -> Item {
        Item::new(suffix, ItemType::Pallet, true, false, "BAY-A")
    }

    fn sample_item_log() -> ItemLogEntry {
        ItemLogEntry {
            scanner: "Scanner-01".to_string(),
            truck_id: "TRK-1".to_string(),
            door: Some("D1".to_string()),
            item_id: "PALLET-P-01".to_string(),
            item_type: ItemType::Pallet,
            barcode_valid: true,
            label_damaged: false,
            scan_success: true,
            attempts: 1,
            scan_time_s: 2.73,
            door_in_ok: true,
            door_out_ok: None,
            row_created_id: None,
        }
    }

    #[test]
    fn test_empty_inputs_are_noops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        export_item_logs(&[], &path).unwrap();
        export_row_logs(&[], &path).unwrap();
        export_rows_status(&[], &path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_item_logs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item_logs.csv");

        let logs = vec![sample_item_log()];
        export_item_logs(&logs, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let parsed: Vec<ItemLogEntry> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(parsed, logs);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/reports/item_logs.csv");

        export_item_logs(&[sample_item_log()], &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_rows_status_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows_status.csv");

        let mut truck = Truck::new("TRK-1", Some("D1".to_string()), 2);
        truck.add_row(Row::new(1, vec![pallet("1"), pallet("2")]));
        truck.add_row(Row::new(2, vec![pallet("3")]));

        export_rows_status(&truck.rows_status(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("truck_id"));
        assert!(header.contains("strap_status"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_truck_summary_single_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let truck = Truck::new("TRK-1", None, 3);
        export_truck_summary(&truck.summary(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        // Header plus exactly one record.
        assert_eq!(content.lines().count(), 2);
    }
}
