//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    All prices, subtotals and payments are i64 minor units (cents).     │
//! │    The ONLY place a float enters money math is the weighed-service     │
//! │    quantity (3.5 kg), and that multiplication rounds half-up exactly   │
//! │    once, at line entry time. The rounded subtotal is then frozen.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use suds_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(700_000); // 7,000.00 per kg
//!
//! // A 3.5 kg wash: subtotal frozen at entry time
//! let subtotal = price.multiply_quantity(3.5);
//! assert_eq!(subtotal.cents(), 2_450_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences (total - paid) may dip
///   negative before clamping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use suds_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtraction clamped at zero.
    ///
    /// ## Example
    /// ```rust
    /// use suds_core::money::Money;
    ///
    /// let total = Money::from_cents(100);
    /// let paid = Money::from_cents(150);
    /// assert_eq!(total.sub_clamped(paid), Money::zero());
    /// ```
    #[inline]
    pub fn sub_clamped(&self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// ## Weighed Services
    /// ```text
    /// Service: Wash & Fold, 7,000.00 / kg
    /// Weight:  3.5 kg
    ///      │
    ///      ▼
    /// multiply_quantity(3.5) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line subtotal: 24,500.00  (frozen on the line item)
    /// ```
    ///
    /// The result rounds half away from zero. This is the single rounding
    /// point in the system; the produced subtotal is stored and never
    /// recomputed, so later price changes cannot drift historical totals.
    pub fn multiply_quantity(&self, quantity: f64) -> Money {
        Money((self.0 as f64 * quantity).round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. UI display formatting (currency symbol,
/// thousand separators, locale) lives with the UI, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summation for report folds.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
