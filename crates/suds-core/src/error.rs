//! # Error Types
//!
//! Domain-specific error types for suds-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  suds-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  suds-db errors (separate crate)                                        │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  suds-notify errors (separate crate)                                    │
//! │  └── NotifyError      - Scan failures (always retryable)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → view-state error field  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field, statuses)
//! 3. Errors are enum variants, never bare Strings
//! 4. Validation outcomes are returned as values, never thrown mid-computation

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A status write was rejected by the transition table.
    ///
    /// ## When This Occurs
    /// - Moving a terminal (`done`/`cancelled`) transaction anywhere
    /// - Skipping a step (`new` → `ready`)
    /// - Rewinding (`ready` → `processing`)
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalStatusTransition {
        from: &'static str,
        to: &'static str,
    },

    /// Payment amount failed validation.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, non-finite weight).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
        let err = CoreError::IllegalStatusTransition {
            from: "done",
            to: "new",
        };
        assert_eq!(err.to_string(), "Illegal status transition: done -> new");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "name must be at most 100 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
