//! # Payment Domain Logic
//!
//! Pure functions deriving payment state from a transaction's cumulative
//! `paid` amount and its `total`.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Cashier enters additional payment                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_payment_amount(current_paid, proposed, total)                 │
//! │       │                                                                 │
//! │       ├── Invalid(..)          → block, show reason inline              │
//! │       ├── Overpayment{excess}  → caller decides: block or warn          │
//! │       └── Valid                → apply (caller mutates paid amount)     │
//! │                                                                         │
//! │  After apply, the UI rederives:                                         │
//! │    classify_payment_status → Unpaid | Partial | Paid                    │
//! │    remaining_balance       → amount still owed (never negative)         │
//! │    payment_progress        → [0,1] ratio for the progress bar           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is a pure decision function with no side effects.
//! Applying a payment (mutating `paid`) is a separate, caller-driven step,
//! which keeps validation unit-testable independently of storage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Payment Status
// =============================================================================

/// Derived payment state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Unpaid,
    /// Some, but not all, of the total has been paid.
    Partial,
    /// Paid in full (or over).
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        };
        f.write_str(s)
    }
}

/// Classifies a transaction's payment state.
///
/// ## Ordering Invariant
/// The `paid <= 0` check runs BEFORE the `paid >= total` check. When both
/// `total <= 0` and `paid <= 0`, the result is `Unpaid`, not `Paid`, even
/// though `0 >= 0`. A zero-total transaction with no payment reads as
/// unpaid, which is what the counter staff expect to see.
///
/// ## Example
/// ```rust
/// use suds_core::money::Money;
/// use suds_core::payment::{classify_payment_status, PaymentStatus};
///
/// let total = Money::from_cents(100);
/// assert_eq!(
///     classify_payment_status(Money::zero(), total),
///     PaymentStatus::Unpaid
/// );
/// assert_eq!(
///     classify_payment_status(Money::from_cents(50), total),
///     PaymentStatus::Partial
/// );
/// assert_eq!(
///     classify_payment_status(Money::from_cents(150), total),
///     PaymentStatus::Paid
/// );
/// ```
pub fn classify_payment_status(paid: Money, total: Money) -> PaymentStatus {
    if paid.cents() <= 0 {
        PaymentStatus::Unpaid
    } else if paid >= total {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

/// Amount still owed: `max(total - paid, 0)`.
///
/// Never negative, even if `paid` exceeds `total` due to a prior data
/// inconsistency.
pub fn remaining_balance(paid: Money, total: Money) -> Money {
    total.sub_clamped(paid)
}

/// Payment progress ratio in `[0, 1]` for the progress indicator.
///
/// `clamp(paid / total, 0, 1)` when `total > 0`, else `0`. Never divides
/// by zero and never returns a value outside `[0, 1]`.
pub fn payment_progress(paid: Money, total: Money) -> f64 {
    if total.cents() <= 0 {
        return 0.0;
    }
    (paid.cents() as f64 / total.cents() as f64).clamp(0.0, 1.0)
}

// =============================================================================
// Payment Amount Validation
// =============================================================================

/// Why a proposed payment amount was rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidAmount {
    /// Negative amounts are never acceptable.
    Negative,
    /// A zero amount means the field was left empty.
    Zero,
}

impl fmt::Display for InvalidAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidAmount::Negative => "amount must be positive",
            InvalidAmount::Zero => "enter a payment amount",
        };
        f.write_str(msg)
    }
}

/// Outcome of validating a proposed additional payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCheck {
    /// Amount is acceptable as-is.
    Valid,
    /// Amount is malformed; surfaced inline next to the input.
    Invalid(InvalidAmount),
    /// Amount would push `paid` past `total` by `excess`. Reported, never
    /// silently clamped; the caller decides whether to block or warn.
    Overpayment { excess: Money },
}

impl PaymentCheck {
    /// Whether the caller may apply the amount without further decisions.
    pub fn is_valid(&self) -> bool {
        matches!(self, PaymentCheck::Valid)
    }
}

/// Validates a proposed additional payment against the business rules.
///
/// ## Evaluation Order (first match wins)
/// 1. `proposed < 0`                      → `Invalid(Negative)`
/// 2. `proposed == 0`                     → `Invalid(Zero)`
/// 3. `current_paid + proposed > total`   → `Overpayment { excess }`
/// 4. otherwise                           → `Valid`
///
/// ## Example
/// ```rust
/// use suds_core::money::Money;
/// use suds_core::payment::{validate_payment_amount, PaymentCheck};
///
/// let total = Money::from_cents(100);
/// let paid = Money::from_cents(50);
///
/// assert_eq!(
///     validate_payment_amount(paid, Money::from_cents(40), total),
///     PaymentCheck::Valid
/// );
/// assert_eq!(
///     validate_payment_amount(paid, Money::from_cents(60), total),
///     PaymentCheck::Overpayment {
///         excess: Money::from_cents(10)
///     }
/// );
/// ```
pub fn validate_payment_amount(
    current_paid: Money,
    proposed: Money,
    total: Money,
) -> PaymentCheck {
    if proposed.is_negative() {
        return PaymentCheck::Invalid(InvalidAmount::Negative);
    }
    if proposed.is_zero() {
        return PaymentCheck::Invalid(InvalidAmount::Zero);
    }
    let after = current_paid + proposed;
    if after > total {
        return PaymentCheck::Overpayment {
            excess: after - total,
        };
    }
    PaymentCheck::Valid
}

// =============================================================================
// Unit Tests
// =============================================================================
