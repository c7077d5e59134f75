//! # Live Read Subscriptions
//!
//! Per-table change signals backing the reactive read streams.
//!
//! ## How Subscriptions Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Repository write (insert / update / delete)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreEvents::bump_<table>()  ← version counter += 1                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Every watch::Receiver for that table wakes up                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository::watch_all() re-queries and yields a FULL snapshot          │
//! │                                                                         │
//! │  Consumers treat each snapshot as authoritative and replacing, never    │
//! │  incremental. watch channels coalesce bursts: a subscriber may skip     │
//! │  intermediate versions but always sees the state after the last write.  │
//! │                                                                         │
//! │  Dropping the stream drops the Receiver; nothing lingers.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::watch;

/// Per-table write counters used to wake live subscribers.
///
/// One instance is shared (via `Arc`) by the [`Database`] handle and every
/// repository cloned out of it.
///
/// [`Database`]: crate::pool::Database
#[derive(Debug)]
pub struct StoreEvents {
    customers: watch::Sender<u64>,
    services: watch::Sender<u64>,
    transactions: watch::Sender<u64>,
}

impl StoreEvents {
    pub fn new() -> Self {
        StoreEvents {
            customers: watch::channel(0).0,
            services: watch::channel(0).0,
            transactions: watch::channel(0).0,
        }
    }

    /// Signals that the customers table changed.
    pub fn bump_customers(&self) {
        self.customers.send_modify(|v| *v += 1);
    }

    /// Signals that the services table changed.
    pub fn bump_services(&self) {
        self.services.send_modify(|v| *v += 1);
    }

    /// Signals that the transactions (or transaction_lines) table changed.
    pub fn bump_transactions(&self) {
        self.transactions.send_modify(|v| *v += 1);
    }

    /// Subscribes to customer-table changes.
    pub fn customers_rx(&self) -> watch::Receiver<u64> {
        self.customers.subscribe()
    }

    /// Subscribes to service-table changes.
    pub fn services_rx(&self) -> watch::Receiver<u64> {
        self.services.subscribe()
    }

    /// Subscribes to transaction-table changes.
    pub fn transactions_rx(&self) -> watch::Receiver<u64> {
        self.transactions.subscribe()
    }
}

impl Default for StoreEvents {
    fn default() -> Self {
        StoreEvents::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bump_wakes_subscriber() {
        let events = StoreEvents::new();
        let mut rx = events.transactions_rx();

        assert_eq!(*rx.borrow_and_update(), 0);

        events.bump_transactions();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[tokio::test]
    async fn test_tables_are_independent() {
        let events = StoreEvents::new();
        let mut customers = events.customers_rx();
        customers.borrow_and_update();

        events.bump_services();
        assert!(!customers.has_changed().unwrap());

        events.bump_customers();
        assert!(customers.has_changed().unwrap());
    }
}
