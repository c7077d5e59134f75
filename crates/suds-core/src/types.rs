//! # Domain Types
//!
//! Core domain types used throughout SudsPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌──────────────────┐  │
//! │  │    Customer     │   │ LaundryTransaction  │   │ TransactionLine  │  │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ──────────────  │  │
//! │  │  id (UUID)      │◄──│  customer_id (weak) │──►│  service_id      │  │
//! │  │  name           │   │  customer_name*     │   │  service_name*   │  │
//! │  │  phone          │   │  total_cents        │   │  unit_price*     │  │
//! │  │  address        │   │  paid_cents         │   │  quantity        │  │
//! │  └─────────────────┘   │  status             │   │  subtotal_cents* │  │
//! │                        │  date_in/out        │   └──────────────────┘  │
//! │  ┌─────────────────┐   │  estimated_date     │     * = snapshot,       │
//! │  │     Service     │   └─────────────────────┘         frozen at entry │
//! │  │  ─────────────  │                                                   │
//! │  │  id, name       │   Customer and Service references are WEAK:       │
//! │  │  price_cents    │   deleting a customer nulls customer_id, and      │
//! │  │  unit (kg/item) │   services are soft-deactivated, never deleted,   │
//! │  │  is_active      │   so history always survives on its snapshots.    │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::payment::{self, PaymentStatus};
use crate::status::TransactionStatus;

/// Display label for a line item whose service snapshot is unusable.
///
/// Report and detail views fall back to this instead of failing the whole
/// computation; the line's stored subtotal still counts toward revenue.
pub const SERVICE_NOT_FOUND_LABEL: &str = "Service not found";

// =============================================================================
// Customer
// =============================================================================

/// A laundry customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Street address for pickup/delivery.
    pub address: Option<String>,

    /// When the customer record was created.
    pub created_at: DateTime<Utc>,

    /// When the customer record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Service
// =============================================================================

/// Pricing unit for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ServiceUnit {
    /// Priced per kilogram; line quantity is a weight.
    Kg,
    /// Priced per piece; line quantity is an item count.
    Item,
}

impl ServiceUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ServiceUnit::Kg => "kg",
            ServiceUnit::Item => "item",
        }
    }
}

/// A priced laundry service on the price list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the new-transaction picker.
    pub name: String,

    /// Price per unit in the smallest currency unit.
    pub price_cents: i64,

    /// Whether the price applies per kg or per item.
    pub unit: ServiceUnit,

    /// Soft toggle: inactive services are excluded from new-transaction
    /// pickers but remain referenced by historical line items.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub price_cents: i64,
    pub unit: ServiceUnit,
}

// =============================================================================
// Laundry Transaction
// =============================================================================

/// A laundry order bundling one or more service line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LaundryTransaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Weak reference to the customer; null when the customer was deleted
    /// or was never linked (walk-in).
    pub customer_id: Option<String>,

    /// Customer name snapshot, kept even if the customer link is lost.
    pub customer_name: String,

    /// Sum of the line items' frozen subtotals. Maintained by every write
    /// path that touches the line set, never by the store itself.
    pub total_cents: i64,

    /// Cumulative amount paid. Starts at 0 and only grows.
    pub paid_cents: i64,

    /// Lifecycle status (see [`TransactionStatus`]).
    pub status: TransactionStatus,

    /// Intake timestamp. Required; drives the report windows.
    pub date_in: DateTime<Utc>,

    /// Completion timestamp; null until the order reaches `done`.
    pub date_out: Option<DateTime<Utc>>,

    /// Promised pickup deadline; drives the overdue scan when present.
    pub estimated_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LaundryTransaction {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the amount paid as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Derived payment state.
    pub fn payment_status(&self) -> PaymentStatus {
        payment::classify_payment_status(self.paid(), self.total())
    }

    /// Amount still owed (never negative).
    pub fn remaining(&self) -> Money {
        payment::remaining_balance(self.paid(), self.total())
    }

    /// Payment progress ratio in `[0, 1]`.
    pub fn payment_progress(&self) -> f64 {
        payment::payment_progress(self.paid(), self.total())
    }
}

/// Input for creating (or re-heading) a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub date_in: DateTime<Utc>,
    pub estimated_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Transaction Line
// =============================================================================

/// One line linking a transaction to a service with a quantity and a
/// frozen subtotal.
///
/// ## Snapshot Pattern
/// `service_name`, `unit_price_cents` and `unit` are copied from the
/// service at entry time, and `subtotal_cents` is computed exactly once
/// (`quantity × unit price`, rounded). Later price changes or service
/// deactivation cannot alter historical lines or totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionLine {
    pub id: String,

    /// Strong reference; lines are cascade-deleted with their transaction.
    pub transaction_id: String,

    /// Weak reference to the service. Nullable so a lost service can never
    /// take the line's history with it.
    pub service_id: Option<String>,

    /// Service name at entry time (frozen).
    pub service_name: String,

    /// Unit price at entry time (frozen).
    pub unit_price_cents: i64,

    /// Pricing unit at entry time (frozen).
    pub unit: ServiceUnit,

    /// Weight in kg for `kg` services, piece count for `item` services.
    pub quantity: f64,

    /// `quantity × unit price`, rounded once at entry time and stored.
    pub subtotal_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl TransactionLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the frozen subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Display name, falling back to a placeholder when the snapshot is
    /// unusable. Revenue still counts the line's stored subtotal either way.
    pub fn display_name(&self) -> &str {
        let trimmed = self.service_name.trim();
        if trimmed.is_empty() {
            SERVICE_NOT_FOUND_LABEL
        } else {
            trimmed
        }
    }
}

/// Input for one line of a create/edit write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLine {
    pub service_id: Option<String>,
    pub service_name: String,
    pub unit_price_cents: i64,
    pub unit: ServiceUnit,
    pub quantity: f64,
}

impl NewLine {
    /// Builds a line input from a service on the price list, snapshotting
    /// its name, price and unit.
    pub fn for_service(service: &Service, quantity: f64) -> NewLine {
        NewLine {
            service_id: Some(service.id.clone()),
            service_name: service.name.clone(),
            unit_price_cents: service.price_cents,
            unit: service.unit,
            quantity,
        }
    }

    /// The line's subtotal, computed once at entry time.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// A transaction together with its line items, as read back by the
/// "with services" query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionWithLines {
    pub transaction: LaundryTransaction,
    pub lines: Vec<TransactionLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
