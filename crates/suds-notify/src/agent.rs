//! # Overdue Scan Agent
//!
//! Background task that periodically scans open orders for missed or
//! approaching pickup deadlines and hands the results to a [`Notifier`].
//!
//! ## Agent Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OverdueAgent                                      │
//! │                                                                         │
//! │  tokio interval tick ──► run_scan                                       │
//! │       │                    │                                            │
//! │       │                    ├─ list_all() from suds-db                   │
//! │       │                    ├─ partition_due(txs, now, window)  (pure)   │
//! │       │                    └─ notifier.notify(..) per flagged order     │
//! │       │                                                                 │
//! │  A failed pass is logged and dropped; the next tick retries from        │
//! │  scratch. The scan holds no state between passes, so a missed pass      │
//! │  loses nothing.                                                         │
//! │                                                                         │
//! │  shutdown channel ──► loop exits, task ends                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chrono::{DateTime, Utc};
use suds_db::Database;

use crate::config::ScanConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::scan::{notification_for, partition_due, Notification};

// =============================================================================
// Notifier Trait
// =============================================================================

/// Delivery sink for scan results (platform notifications, a bell icon,
/// a test recorder).
///
/// Notifications are keyed by `transaction_id`: delivering one for an id
/// that already has a visible notification replaces it, so repeated scan
/// passes refresh rather than stack.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: &Notification) -> NotifyResult<()>;
}

/// No-op notifier for testing and headless runs.
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: &Notification) -> NotifyResult<()> {
        Ok(())
    }
}

// =============================================================================
// Scan Pass
// =============================================================================

/// Outcome of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Orders whose deadline already passed.
    pub overdue: usize,

    /// Orders due within the approaching window.
    pub approaching: usize,

    /// Notifications that failed to deliver.
    pub delivery_failures: usize,
}

/// Runs one scan pass at an explicit instant.
///
/// Reads every transaction, partitions by deadline, and delivers one
/// notification per flagged order. Delivery failures are counted and
/// logged but do not abort the pass; the remaining notifications still
/// go out.
pub async fn run_scan(
    db: &Database,
    notifier: &dyn Notifier,
    as_of: DateTime<Utc>,
    approaching_window: chrono::Duration,
) -> NotifyResult<ScanReport> {
    let transactions = db.transactions().list_all().await?;
    let partition = partition_due(transactions, as_of, approaching_window);

    let mut report = ScanReport {
        overdue: partition.overdue.len(),
        approaching: partition.approaching.len(),
        ..Default::default()
    };

    let flagged = partition
        .overdue
        .iter()
        .map(|tx| (tx, true))
        .chain(partition.approaching.iter().map(|tx| (tx, false)));

    for (tx, is_overdue) in flagged {
        let notification = notification_for(tx, is_overdue);
        if let Err(e) = notifier.notify(&notification) {
            warn!(
                transaction_id = %notification.transaction_id,
                error = %e,
                "Notification delivery failed"
            );
            report.delivery_failures += 1;
        }
    }

    if report.overdue > 0 || report.approaching > 0 {
        info!(
            overdue = report.overdue,
            approaching = report.approaching,
            failures = report.delivery_failures,
            "Pickup scan complete"
        );
    } else {
        debug!("Pickup scan complete, nothing due");
    }

    Ok(report)
}

// =============================================================================
// Overdue Agent
// =============================================================================

/// Periodic scan agent. Spawns a background task on `start` and runs
/// until `shutdown`.
pub struct OverdueAgent {
    config: ScanConfig,
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl OverdueAgent {
    /// Creates an agent with a no-op notifier.
    pub fn new(config: ScanConfig, db: Arc<Database>) -> Self {
        Self::with_notifier(config, db, Arc::new(NoOpNotifier))
    }

    /// Creates an agent with a custom delivery sink.
    pub fn with_notifier(
        config: ScanConfig,
        db: Arc<Database>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        OverdueAgent {
            config,
            db,
            notifier,
            shutdown_tx: None,
            task: None,
        }
    }

    /// Starts the background scan loop.
    ///
    /// The first pass runs immediately; later passes follow the configured
    /// interval. A pass that fails (database unavailable mid-scan) is
    /// logged and retried on the next tick.
    pub fn start(&mut self) -> NotifyResult<()> {
        if self.shutdown_tx.is_some() {
            return Err(NotifyError::AgentState("agent already started".into()));
        }

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        self.shutdown_tx = Some(shutdown_tx);

        let db = self.db.clone();
        let notifier = self.notifier.clone();
        let interval = self.config.effective_interval();
        let window = self.config.approaching_window;

        info!(interval_secs = interval.as_secs(), "Starting overdue scan agent");

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = run_scan(&db, notifier.as_ref(), Utc::now(), window).await {
                            warn!(error = %e, "Scan pass failed, retrying next tick");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Overdue scan agent received shutdown");
                        break;
                    }
                }
            }

            info!("Overdue scan agent stopped");
        }));

        Ok(())
    }

    /// Stops the scan loop gracefully and waits for it to exit. On return
    /// no further scan pass can run.
    pub async fn shutdown(&mut self) -> NotifyResult<()> {
        let tx = self
            .shutdown_tx
            .take()
            .ok_or_else(|| NotifyError::AgentState("agent not started".into()))?;
        let _ = tx.send(()).await;

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
