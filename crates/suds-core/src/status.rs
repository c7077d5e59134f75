//! # Transaction Status State Machine
//!
//! Lifecycle states for a laundry order and the table of legal transitions.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   new ──► processing ──► ready ──► done (terminal, stamps date_out)   │
//! │    │           │            │                                           │
//! │    └───────────┴────────────┴────► cancelled (terminal, no date_out)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status is a closed enumeration, not a free-form tag: every write path
//! checks [`TransactionStatus::can_transition_to`] and rejects illegal
//! transitions with [`CoreError::IllegalStatusTransition`].
//!
//! [`CoreError::IllegalStatusTransition`]: crate::error::CoreError::IllegalStatusTransition

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// =============================================================================
// Transaction Status
// =============================================================================

/// The lifecycle status of a laundry transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Order just taken in, nothing started yet.
    New,
    /// Laundry is being washed/ironed.
    Processing,
    /// Finished, waiting for customer pickup.
    Ready,
    /// Picked up and closed. Entering this state stamps `date_out`.
    Done,
    /// Cancelled before completion. Does NOT stamp `date_out`.
    Cancelled,
}

impl TransactionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::New,
        TransactionStatus::Processing,
        TransactionStatus::Ready,
        TransactionStatus::Done,
        TransactionStatus::Cancelled,
    ];

    /// The persisted status code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::New => "new",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Ready => "ready",
            TransactionStatus::Done => "done",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a status code.
    ///
    /// Normalizes to lower-case first so the persisted value and UI-level
    /// filter strings always agree on the same bucket.
    pub fn parse(s: &str) -> Option<TransactionStatus> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(TransactionStatus::New),
            "processing" => Some(TransactionStatus::Processing),
            "ready" => Some(TransactionStatus::Ready),
            "done" => Some(TransactionStatus::Done),
            "cancelled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether no further forward transition is expected from this status.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Done | TransactionStatus::Cancelled)
    }

    /// The set of statuses this one may legally move to.
    pub const fn allowed_transitions(&self) -> &'static [TransactionStatus] {
        match self {
            TransactionStatus::New => {
                &[TransactionStatus::Processing, TransactionStatus::Cancelled]
            }
            TransactionStatus::Processing => {
                &[TransactionStatus::Ready, TransactionStatus::Cancelled]
            }
            TransactionStatus::Ready => {
                &[TransactionStatus::Done, TransactionStatus::Cancelled]
            }
            // Terminal states go nowhere.
            TransactionStatus::Done | TransactionStatus::Cancelled => &[],
        }
    }

    /// Checks transition legality against the table above.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Checks a transition, returning a typed error when it is illegal.
    ///
    /// ## Example
    /// ```rust
    /// use suds_core::status::TransactionStatus;
    ///
    /// TransactionStatus::New
    ///     .check_transition(TransactionStatus::Processing)
    ///     .unwrap();
    /// assert!(TransactionStatus::Done
    ///     .check_transition(TransactionStatus::New)
    ///     .is_err());
    /// ```
    pub fn check_transition(&self, next: TransactionStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::IllegalStatusTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::New
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
