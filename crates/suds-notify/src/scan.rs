//! # Overdue Scan Logic
//!
//! Pure partitioning of open orders by pickup deadline. No clock reads:
//! the scan instant is an explicit argument, so every decision here is
//! testable with fixed timestamps.
//!
//! ## Partition Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  For each transaction:                                                  │
//! │                                                                         │
//! │    terminal (done/cancelled)?  ──► skip (nothing left to pick up,       │
//! │                                     or order is void)                   │
//! │    no estimated_date?          ──► skip (no promise was made)           │
//! │                                                                         │
//! │    estimated_date <  as_of               ──► OVERDUE                    │
//! │    as_of <= estimated_date <= as_of + w  ──► APPROACHING                │
//! │    estimated_date >  as_of + w           ──► skip (not yet relevant)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use suds_core::LaundryTransaction;

/// Open orders split by how their pickup deadline relates to the scan
/// instant.
#[derive(Debug, Clone, Default)]
pub struct DuePartition {
    /// Deadline already passed; customer should have picked up.
    pub overdue: Vec<LaundryTransaction>,

    /// Deadline falls within the configured window ahead of the scan.
    pub approaching: Vec<LaundryTransaction>,
}

impl DuePartition {
    /// Whether the scan found anything worth notifying about.
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.approaching.is_empty()
    }
}

/// Partitions transactions by pickup deadline.
///
/// Terminal orders and orders without a promised date are excluded
/// entirely. A deadline exactly at `as_of` counts as approaching, not
/// overdue.
pub fn partition_due(
    transactions: Vec<LaundryTransaction>,
    as_of: DateTime<Utc>,
    approaching_window: Duration,
) -> DuePartition {
    let horizon = as_of + approaching_window;
    let mut partition = DuePartition::default();

    for tx in transactions {
        if tx.status.is_terminal() {
            continue;
        }
        let Some(estimated) = tx.estimated_date else {
            continue;
        };

        if estimated < as_of {
            partition.overdue.push(tx);
        } else if estimated <= horizon {
            partition.approaching.push(tx);
        }
    }

    partition
}

/// One notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The transaction the notification is about.
    pub transaction_id: String,

    /// True for a missed deadline, false for an approaching one.
    pub is_overdue: bool,

    /// Short headline for the platform notification.
    pub title: String,

    /// Body text naming the customer and deadline.
    pub body: String,
}

/// Renders the notification for one flagged transaction.
pub fn notification_for(tx: &LaundryTransaction, is_overdue: bool) -> Notification {
    let deadline = tx
        .estimated_date
        .map(|d| d.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let (title, body) = if is_overdue {
        (
            "Pickup overdue".to_string(),
            format!(
                "{}'s order was due {} and has not been picked up",
                tx.customer_name, deadline
            ),
        )
    } else {
        (
            "Pickup due soon".to_string(),
            format!("{}'s order is due {}", tx.customer_name, deadline),
        )
    };

    Notification {
        transaction_id: tx.id.clone(),
        is_overdue,
        title,
        body,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use suds_core::TransactionStatus;

    fn tx(
        id: &str,
        status: TransactionStatus,
        estimated_date: Option<DateTime<Utc>>,
    ) -> LaundryTransaction {
        let created = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        LaundryTransaction {
            id: id.to_string(),
            customer_id: None,
            customer_name: "Siti".to_string(),
            total_cents: 10_000,
            paid_cents: 0,
            status,
            date_in: created,
            date_out: None,
            estimated_date,
            created_at: created,
            updated_at: created,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_partition_basic() {
        let as_of = at(10, 12);
        let window = Duration::hours(24);

        let txs = vec![
            tx("past", TransactionStatus::Ready, Some(at(9, 12))),
            tx("soon", TransactionStatus::Processing, Some(at(11, 6))),
            tx("later", TransactionStatus::New, Some(at(14, 0))),
        ];

        let partition = partition_due(txs, as_of, window);
        assert_eq!(partition.overdue.len(), 1);
        assert_eq!(partition.overdue[0].id, "past");
        assert_eq!(partition.approaching.len(), 1);
        assert_eq!(partition.approaching[0].id, "soon");
    }

    #[test]
    fn test_deadline_exactly_now_is_approaching() {
        let as_of = at(10, 12);
        let txs = vec![tx("now", TransactionStatus::Ready, Some(as_of))];

        let partition = partition_due(txs, as_of, Duration::hours(24));
        assert!(partition.overdue.is_empty());
        assert_eq!(partition.approaching.len(), 1);
    }

    #[test]
    fn test_deadline_exactly_at_horizon_is_approaching() {
        let as_of = at(10, 12);
        let window = Duration::hours(24);
        let txs = vec![tx("edge", TransactionStatus::Ready, Some(as_of + window))];

        let partition = partition_due(txs, as_of, window);
        assert_eq!(partition.approaching.len(), 1);
    }

    #[test]
    fn test_terminal_and_undated_excluded() {
        let as_of = at(10, 12);
        let txs = vec![
            tx("done", TransactionStatus::Done, Some(at(9, 0))),
            tx("cancelled", TransactionStatus::Cancelled, Some(at(9, 0))),
            tx("no-promise", TransactionStatus::Ready, None),
        ];

        let partition = partition_due(txs, as_of, Duration::hours(24));
        assert!(partition.is_empty());
    }

    #[test]
    fn test_notification_texts() {
        let order = tx("t1", TransactionStatus::Ready, Some(at(9, 12)));

        let overdue = notification_for(&order, true);
        assert!(overdue.is_overdue);
        assert_eq!(overdue.title, "Pickup overdue");
        assert!(overdue.body.contains("Siti"));
        assert!(overdue.body.contains("09 Aug 2026"));

        let soon = notification_for(&order, false);
        assert!(!soon.is_overdue);
        assert_eq!(soon.title, "Pickup due soon");
    }
}
