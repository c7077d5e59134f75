//! # Validation Module
//!
//! Input validation utilities for SudsPOS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form / view-state                                             │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── CHECK constraints (status/unit codes)                              │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_NAME_LEN, MAX_PHONE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer or service display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 100 characters
///
/// ## Example
/// ```rust
/// use suds_core::validation::validate_name;
///
/// assert!(validate_name("Wash & Fold").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 20 characters
/// - Digits plus `+ - ( )` and spaces only
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in the smallest currency unit.
///
/// ## Rules
/// - Must be positive; the price list has no free services
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a line quantity (kg weight or item count).
///
/// ## Rules
/// - Must be finite (no NaN/inf from a bad parse)
/// - Must be positive
/// - Must not exceed MAX_LINE_QUANTITY (guards against a mistyped 1000
///   instead of 10.00)
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use suds_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Wash & Fold").is_ok());
        assert!(validate_name("Siti Rahma").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+62 812-3456-7890").is_ok());
        assert!(validate_phone("(021) 555 0101").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone(&"1".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(700_000).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(3.5).is_ok());
        assert!(validate_quantity(1.0).is_ok());

        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-2.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1.0).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
