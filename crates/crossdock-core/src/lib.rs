//! # crossdock-core: Pure Simulation Logic for the Crossdock Scanner
//!
//! This crate is the **heart** of the crossdock simulation. It models the
//! scanner-to-row aggregation pipeline as pure, deterministic state machines
//! with zero file-I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Crossdock Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/simulator                               │   │
//! │  │    generator ──► process_batch ──► close_truck ──► reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ crossdock-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   item    │  │    row    │  │   truck   │  │  scanner  │  │   │
//! │  │   │ ItemType  │  │  RowKind  │  │  straps   │  │  buffers  │  │   │
//! │  │   │ generator │  │ validity  │  │  summary  │  │  logs/KPI │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO FILE I/O • NO NETWORK • SEEDED RANDOMNESS ONLY            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               crossdock-reports (CSV Export Layer)              │   │
//! │  │        item logs, row logs, row status, truck summaries         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`item`] - Scannable units (pallets, cars) with quality attributes
//! - [`generator`] - Seedable random item generation
//! - [`row`] - Fixed-arity item groups with the validity predicate
//! - [`truck`] - Ordered row collections with strap-reachability policy
//! - [`scanner`] - The scan/confirm/buffer/flush state machine
//! - [`log`] - Flat log record and KPI structs consumed by exporters
//! - [`error`] - Config validation errors
//!
//! ## Design Principles
//!
//! 1. **Injected randomness**: every stochastic component owns a seedable RNG
//!    passed in at construction - same seed, same run
//! 2. **Failure is data**: scan and door failures are booleans in log records,
//!    never errors - the only `Err` surface is config validation
//! 3. **Append-only history**: rows and logs are never removed once recorded
//! 4. **Single-threaded**: one Scanner serves one logical session; concurrent
//!    drivers must serialize access externally (see `ScannerState` in the
//!    simulator app)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod generator;
pub mod item;
pub mod log;
pub mod row;
pub mod scanner;
pub mod truck;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use crossdock_core::Scanner` instead of
// `use crossdock_core::scanner::Scanner`

pub use error::{CoreError, ValidationError};
pub use generator::ItemGenerator;
pub use item::{Item, ItemType};
pub use log::{ItemLogEntry, RowLogEntry, ScanOutcome, ScannerMetrics};
pub use row::{Row, RowKind};
pub use scanner::{RngDice, ScanDice, Scanner, ScannerConfig};
pub use truck::{RowStatus, StrapStatus, Truck, TruckSummary};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of pallets that complete one row.
///
/// ## Business Rule
/// A row of exactly 2 pallets is valid and eligible for one strap.
pub const PALLET_ROW_SIZE: usize = 2;

/// Number of cars that complete one row.
///
/// ## Business Rule
/// A row of exactly 3 cars is valid and eligible for one strap.
pub const CAR_ROW_SIZE: usize = 3;

/// Destination bays items can be routed to.
///
/// Fixed set for the whole facility; the generator picks uniformly from it.
pub const DESTINATION_BAYS: &[&str] = &["BAY-A", "BAY-B", "BAY-C", "BAY-D"];

/// Rounds a value to 2 decimal places.
///
/// All exported times, percentages and indexes use this rounding so the
/// CSV/KPI surface is stable regardless of float noise.
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
