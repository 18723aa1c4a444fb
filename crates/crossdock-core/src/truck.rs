//! # Trucks
//!
//! A truck is an append-only, ordered collection of rows plus the strap
//! reachability policy for its door position.
//!
//! ## Strap Reachability
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Truck (strap_reach_limit = 3)                         │
//! │                                                                         │
//! │   door ──► [row 1] [row 2] [row 3] │ [row 4] [row 5] ...               │
//! │            └─────reachable──────┘  │ └───out of reach───┘              │
//! │                                                                         │
//! │   Reachability is purely positional: 1-indexed append position vs      │
//! │   strap_reach_limit. Row content never affects reach.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The truck performs no validation on appended rows - it records history;
//! the scanner (or the caller) decides what counts.

use serde::{Deserialize, Serialize};

use crate::row::{Row, RowKind};
use crate::round2;

// =============================================================================
// Strap Status
// =============================================================================

/// Per-row strap outcome, derived from validity and reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrapStatus {
    /// Row does not meet the crossdock rules; no strap is spent on it.
    Invalid,
    /// Row is valid and within reach; a strap is applied.
    Applied,
    /// Row is valid but beyond the strap reach limit.
    NotPossibleReach,
}

// =============================================================================
// Row Status Record
// =============================================================================

/// Flat per-row status record, shaped for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowStatus {
    pub truck_id: String,
    pub door: Option<String>,
    pub row_id: u32,
    pub row_kind: RowKind,
    /// 1 if the row is valid, 0 otherwise.
    pub strap_required: u32,
    pub strap_status: StrapStatus,
    /// Human-readable explanation; empty for applied straps.
    pub reason: String,
}

// =============================================================================
// Truck Summary
// =============================================================================

/// Aggregate strap-safety figures for one truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckSummary {
    pub truck_id: String,
    pub door: Option<String>,
    pub total_rows: u32,
    pub valid_rows: u32,
    pub straps_required: u32,
    pub straps_applied: u32,
    pub straps_unreachable: u32,
    /// 100 × applied / required, rounded to 2 decimals; 0.0 when nothing is
    /// required.
    pub safety_index_pct: f64,
}

// =============================================================================
// Truck
// =============================================================================

/// A truck docked at a door, accumulating rows.
///
/// ## Invariants
/// - `rows` ordering reflects append order; rows are never removed
/// - Row reachability is positional: 1-indexed position ≤ `strap_reach_limit`
/// - Appending performs no validation (invalid rows are recorded as history)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    /// Externally assigned id, unique across the session.
    pub truck_id: String,

    /// Door identifier the truck is docked at, if assigned.
    pub door: Option<String>,

    /// Rows in append order.
    pub rows: Vec<Row>,

    /// Number of leading row positions a strapping mechanism can reach.
    pub strap_reach_limit: u32,
}

impl Truck {
    /// Creates an empty truck.
    pub fn new(
        truck_id: impl Into<String>,
        door: Option<String>,
        strap_reach_limit: u32,
    ) -> Self {
        Truck {
            truck_id: truck_id.into(),
            door,
            rows: Vec::new(),
            strap_reach_limit,
        }
    }

    /// Appends a row. No validation; the truck records history.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Total number of rows, valid or not.
    #[inline]
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// The rows that follow the crossdock rules.
    pub fn valid_rows(&self) -> Vec<&Row> {
        self.rows.iter().filter(|r| r.is_valid()).collect()
    }

    /// Whether the 1-indexed row position is within strap reach.
    ///
    /// Position is by append order, not by `row_id`.
    #[inline]
    pub fn is_row_reachable(&self, position: u32) -> bool {
        position <= self.strap_reach_limit
    }

    /// Straps required: one per valid row.
    pub fn straps_required(&self) -> u32 {
        self.rows.iter().map(|r| r.required_straps()).sum()
    }

    /// Straps actually applied: rows that are both valid and reachable.
    pub fn straps_applied(&self) -> u32 {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, row)| row.is_valid() && self.is_row_reachable(*i as u32 + 1))
            .count() as u32
    }

    /// Classifies every row as invalid / applied / not reachable.
    ///
    /// Deterministic given `rows` and `strap_reach_limit`; calling it twice
    /// with no intervening mutation yields identical results.
    pub fn rows_status(&self) -> Vec<RowStatus> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let position = i as u32 + 1;
                let (strap_status, reason) = if !row.is_valid() {
                    (
                        StrapStatus::Invalid,
                        "row does not meet rule (2 pallets or 3 cars)".to_string(),
                    )
                } else if self.is_row_reachable(position) {
                    (StrapStatus::Applied, String::new())
                } else {
                    (
                        StrapStatus::NotPossibleReach,
                        "beyond strap reach limit".to_string(),
                    )
                };

                RowStatus {
                    truck_id: self.truck_id.clone(),
                    door: self.door.clone(),
                    row_id: row.row_id,
                    row_kind: row.row_kind(),
                    strap_required: row.required_straps(),
                    strap_status,
                    reason,
                }
            })
            .collect()
    }

    /// Aggregates the truck's strap-safety figures.
    pub fn summary(&self) -> TruckSummary {
        let required = self.straps_required();
        let applied = self.straps_applied();
        let unreachable = required.saturating_sub(applied);

        let safety_index_pct = if required > 0 {
            round2(100.0 * f64::from(applied) / f64::from(required))
        } else {
            0.0
        };

        TruckSummary {
            truck_id: self.truck_id.clone(),
            door: self.door.clone(),
            total_rows: self.total_rows() as u32,
            valid_rows: self.valid_rows().len() as u32,
            straps_required: required,
            straps_applied: applied,
            straps_unreachable: unreachable,
            safety_index_pct,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
