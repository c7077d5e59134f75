//! # suds-db: Database Layer for SudsPOS
//!
//! This crate provides database access for the SudsPOS laundry point of
//! sale. It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SudsPOS Data Flow                                 │
//! │                                                                         │
//! │  View-state holder (transactions(), dashboard stream, ...)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     suds-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CustomerRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ServiceRepo   │    │ 001_init.sql │  │   │
//! │  │   │ StoreEvents   │    │ TxnRepo       │    │ ...          │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Every write bumps a per-table version; watch_all() streams   │   │
//! │  │   re-query and yield full replacing snapshots.                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL, foreign keys on)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`watch`] - Per-table change signals for live subscriptions
//! - [`repository`] - Repository implementations (customer, service, transaction)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use suds_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/suds.db")).await?;
//!
//! let order = db
//!     .transactions()
//!     .create_with_lines(new_transaction, lines)
//!     .await?;
//! db.transactions().add_payment(&order.transaction.id, amount).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod watch;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use watch::StoreEvents;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::service::ServiceRepository;
pub use repository::transaction::TransactionRepository;
