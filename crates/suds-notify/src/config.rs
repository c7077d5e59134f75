//! # Scan Configuration

use std::time::Duration;

/// Smallest allowed scan interval.
///
/// The scan reads the full transaction list each pass; anything tighter
/// than this buys no freshness a pickup counter could notice.
pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Default window ahead of now in which a deadline counts as approaching.
pub const DEFAULT_APPROACHING_WINDOW_HOURS: i64 = 24;

/// Configuration for the periodic overdue scan.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use suds_notify::config::ScanConfig;
///
/// let config = ScanConfig::default()
///     .interval(Duration::from_secs(30 * 60))
///     .approaching_window(chrono::Duration::hours(12));
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// How often to run the scan. Values below [`MIN_SCAN_INTERVAL`] are
    /// raised to it.
    pub interval: Duration,

    /// How far ahead of the scan instant a deadline counts as
    /// "approaching".
    pub approaching_window: chrono::Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            interval: MIN_SCAN_INTERVAL,
            approaching_window: chrono::Duration::hours(DEFAULT_APPROACHING_WINDOW_HOURS),
        }
    }
}

impl ScanConfig {
    /// Sets the scan interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the approaching-deadline window.
    pub fn approaching_window(mut self, window: chrono::Duration) -> Self {
        self.approaching_window = window;
        self
    }

    /// The interval the agent actually ticks at, after the floor.
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_SCAN_INTERVAL)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
