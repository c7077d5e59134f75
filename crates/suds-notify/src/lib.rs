//! # suds-notify: Overdue Pickup Scanning for SudsPOS
//!
//! Periodically scans open laundry orders for missed or approaching pickup
//! deadlines and hands notifications to a pluggable delivery sink.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   suds-db ──► OverdueAgent (this crate) ──► Notifier impl               │
//! │                    │                         (platform notifications,   │
//! │                    │                          in-app bell, tests)       │
//! │                    │                                                    │
//! │   The partitioning itself (scan module) is pure: it takes the scan      │
//! │   instant as an argument and never reads the clock, so deadline edge    │
//! │   cases are tested with fixed timestamps.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`scan`] - Pure deadline partitioning and notification rendering
//! - [`agent`] - Background scan loop and the [`Notifier`] trait
//! - [`config`] - Scan interval and window configuration
//! - [`error`] - Error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use suds_notify::{OverdueAgent, ScanConfig};
//!
//! let mut agent = OverdueAgent::new(ScanConfig::default(), db.clone());
//! agent.start()?;
//! // ... on exit:
//! agent.shutdown().await?;
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod scan;

pub use agent::{run_scan, NoOpNotifier, Notifier, OverdueAgent, ScanReport};
pub use config::ScanConfig;
pub use error::{NotifyError, NotifyResult};
pub use scan::{notification_for, partition_due, DuePartition, Notification};
