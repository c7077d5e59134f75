//! # Notification Error Types

use thiserror::Error;

/// Errors from the overdue-scan agent.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Reading transactions from the store failed.
    #[error(transparent)]
    Db(#[from] suds_db::DbError),

    /// Delivering a notification to the platform sink failed.
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    /// The agent was asked to start twice, or stopped before starting.
    #[error("Agent state error: {0}")]
    AgentState(String),
}

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;
