//! # suds-core: Pure Business Logic for SudsPOS
//!
//! This crate is the **heart** of SudsPOS, a point-of-sale system for a
//! laundry business. It contains all business logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SudsPOS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                UI / view-state holders (out of scope)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ suds-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │ payment  │ │  report  │ │ status/validation│  │   │
//! │  │   │ Customer │ │ classify │ │dashboard │ │ transition table │  │   │
//! │  │   │ Service  │ │ validate │ │ rankings │ │ input rules      │  │   │
//! │  │   │ Txn/Line │ │ progress │ │ series   │ │                  │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    suds-db (Database Layer)                      │   │
//! │  │          SQLite queries, migrations, live subscriptions          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Service, LaundryTransaction, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`payment`] - Payment state derivation and amount validation
//! - [`status`] - Transaction status state machine
//! - [`report`] - Dashboard and report aggregates
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - same input =
//!    same output. Time-windowed computations take an explicit `as_of`.
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are i64 minor units
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use suds_core::money::Money;
//! use suds_core::payment::{classify_payment_status, PaymentStatus};
//!
//! let total = Money::from_cents(100_000);
//! let paid = Money::from_cents(40_000);
//!
//! assert_eq!(classify_payment_status(paid, total), PaymentStatus::Partial);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payment;
pub mod report;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use suds_core::Money` instead of
// `use suds_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{
    classify_payment_status, payment_progress, remaining_balance, validate_payment_amount,
    InvalidAmount, PaymentCheck, PaymentStatus,
};
pub use status::TransactionStatus;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of customer and service names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a phone number.
pub const MAX_PHONE_LEN: usize = 20;

/// Maximum quantity on a single line item (kg or pieces).
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10.00).
/// No laundromat load comes close to this.
pub const MAX_LINE_QUANTITY: f64 = 999.0;
