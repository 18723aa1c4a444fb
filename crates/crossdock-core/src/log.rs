//! # Log Records & KPIs
//!
//! Flat, explicitly-typed records produced by the scanner, shaped for direct
//! CSV export (one record = one CSV row; the field set is the schema).
//!
//! ## Record Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Log Record Flow                                   │
//! │                                                                         │
//! │  scan_item ──► ScanOutcome ──┐                                          │
//! │                              ├──► ItemLogEntry ──► item_logs ──► CSV   │
//! │  scan_door_in ───────────────┘                                          │
//! │                                                                         │
//! │  _flush / forced close ─────────► RowLogEntry ───► row_logs ───► CSV   │
//! │                                                                         │
//! │  metrics() ── pure read of item_logs ──► ScannerMetrics                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Schema Stability
//! Exporters derive the CSV header from these structs, so the field sets are
//! part of the external contract: fields are only ever added, never renamed
//! or reordered casually. Optional fields serialize as empty cells.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::ItemType;
use crate::row::RowKind;

// =============================================================================
// Scan Outcome
// =============================================================================

/// Result of one bounded retry loop over a single item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Whether any attempt succeeded.
    pub success: bool,
    /// Attempts consumed (1..=max_attempts).
    pub attempts: u32,
    /// Total elapsed time across attempts, seconds, rounded to 2 decimals.
    pub time_s: f64,
}

// =============================================================================
// Item Log Entry
// =============================================================================

/// Per-item outcome record, appended unconditionally for every item fed
/// through `process_batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLogEntry {
    /// Operator name / device id of the scanner.
    pub scanner: String,
    pub truck_id: String,
    pub door: Option<String>,
    pub item_id: String,
    pub item_type: ItemType,
    pub barcode_valid: bool,
    pub label_damaged: bool,
    pub scan_success: bool,
    pub attempts: u32,
    pub scan_time_s: f64,
    /// Door-in confirmation; false when the barcode scan already failed.
    pub door_in_ok: bool,
    /// Reserved for the removal flow; always `None` in the batch flow.
    pub door_out_ok: Option<bool>,
    /// Id of the row whose creation this item completed, if any.
    pub row_created_id: Option<u32>,
}

// =============================================================================
// Row Log Entry
// =============================================================================

/// Per-row creation record, appended on every threshold flush and on every
/// forced close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowLogEntry {
    pub timestamp: DateTime<Utc>,
    pub scanner: String,
    pub truck_id: String,
    pub door: Option<String>,
    pub row_id: u32,
    pub row_kind: RowKind,
    pub items_count: usize,
    /// Set on forced closes to flag a possibly-invalid row; `None` for
    /// ordinary threshold flushes.
    pub note: Option<String>,
}

// =============================================================================
// Scanner Metrics
// =============================================================================

/// Session KPIs, computed as a pure read of the item logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerMetrics {
    pub scanner: String,
    pub items_processed: usize,
    /// Percent of items whose barcode scan succeeded, 2 decimals.
    pub scan_success_pct: f64,
    /// Percent of items confirmed at the door, 2 decimals.
    pub door_scan_ok_pct: f64,
    /// Mean scan time per item in seconds, 2 decimals.
    pub avg_scan_time_s: f64,
    /// Mean attempts per item, 2 decimals.
    pub avg_attempts: f64,
}

impl ScannerMetrics {
    /// The all-zero record returned when no items have been processed.
    pub fn empty(scanner: impl Into<String>) -> Self {
        ScannerMetrics {
            scanner: scanner.into(),
            items_processed: 0,
            scan_success_pct: 0.0,
            door_scan_ok_pct: 0.0,
            avg_scan_time_s: 0.0,
            avg_attempts: 0.0,
        }
    }
}
