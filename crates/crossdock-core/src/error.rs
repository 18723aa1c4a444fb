//! # Error Types
//!
//! Domain-specific error types for crossdock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  crossdock-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Scanner configuration rejections               │
//! │                                                                         │
//! │  crossdock-reports errors (separate crate)                             │
//! │  └── ReportError      - CSV/filesystem export failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, offending value)
//! 3. Errors are enum variants, never String
//!
//! Note that scan failures and door failures are NOT errors: they are
//! ordinary boolean outcomes recorded in log entries. The only `Err` surface
//! in this crate is construction-time configuration validation.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These errors represent rejected inputs at construction time. The running
/// pipeline itself has no fatal path: the worst runtime outcome is silent
/// buffer loss on a non-forced truck close, which is a policy choice.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Scanner configuration failed validation (wraps ValidationError).
    #[error("Invalid scanner configuration: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Scanner configuration validation errors.
///
/// Raised by [`crate::Scanner::with_rng`] and friends before any state is
/// created, so a Scanner that exists is always well-configured.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A probability knob is outside its allowed interval.
    #[error("{field} must be in {range}, got {value}")]
    ProbabilityOutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },

    /// A duration knob must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: &'static str, value: f64 },

    /// The retry bound must allow at least one attempt.
    #[error("max_attempts must be at least 1")]
    NoAttemptsAllowed,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::ProbabilityOutOfRange {
            field: "base_success",
            range: "(0, 1]",
            value: 1.5,
        };
        assert_eq!(err.to_string(), "base_success must be in (0, 1], got 1.5");

        let err = ValidationError::MustBePositive {
            field: "mean_time_s",
            value: -2.8,
        };
        assert_eq!(err.to_string(), "mean_time_s must be positive, got -2.8");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::NoAttemptsAllowed;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
