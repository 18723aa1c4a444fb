//! # Report Error Types
//!
//! Error types for CSV export operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReportError (this module) ← Adds the export context                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller decides: log and continue, or abort the run                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// CSV export errors.
///
/// These wrap filesystem and serialization failures; the core pipeline never
/// produces them - only the export boundary does.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Creating the parent directory or the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing or serializing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results with ReportError.
pub type ReportResult<T> = Result<T, ReportError>;
