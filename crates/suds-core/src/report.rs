//! # Aggregate / Report Computation
//!
//! Pure folds over the currently-loaded transaction (and line-item) list.
//! There is no incremental maintenance of running totals: every
//! recomputation re-scans the full working set in memory, which is the
//! right trade at this scale and keeps every number reproducible.
//!
//! ## Determinism
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every time-windowed computation takes an explicit `as_of` instant.    │
//! │  Nothing in this module reads the wall clock, so a test can pin        │
//! │  "today" to any moment and assert exact numbers.                       │
//! │                                                                         │
//! │  as_of is a DateTime<FixedOffset>: the offset defines where the        │
//! │  calendar day boundaries fall (the device's local time zone), while    │
//! │  stored timestamps stay in UTC.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! No aggregate here ever panics on an empty input: sums resolve to zero,
//! averages special-case the empty set, rankings come back empty. A line
//! item whose service reference is gone still counts its stored subtotal;
//! only its display name degrades to a placeholder.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;
use crate::status::TransactionStatus;
use crate::types::{LaundryTransaction, TransactionLine};

/// Size of the "top customers" ranking.
pub const TOP_CUSTOMERS_LIMIT: usize = 10;

// =============================================================================
// Status Histogram
// =============================================================================

/// Count of transactions per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistogram {
    pub new: u64,
    pub processing: u64,
    pub ready: u64,
    pub done: u64,
    pub cancelled: u64,
}

impl StatusHistogram {
    /// Count for one status.
    pub const fn count_for(&self, status: TransactionStatus) -> u64 {
        match status {
            TransactionStatus::New => self.new,
            TransactionStatus::Processing => self.processing,
            TransactionStatus::Ready => self.ready,
            TransactionStatus::Done => self.done,
            TransactionStatus::Cancelled => self.cancelled,
        }
    }

    /// Total transactions counted.
    pub const fn total(&self) -> u64 {
        self.new + self.processing + self.ready + self.done + self.cancelled
    }
}

/// Counts transactions per status.
///
/// Status is a closed enum end to end, so the persisted value and any
/// UI-level filter necessarily agree on the same bucket (the historical
/// case-mismatch undercount cannot occur).
pub fn status_histogram(transactions: &[LaundryTransaction]) -> StatusHistogram {
    let mut histogram = StatusHistogram::default();
    for tx in transactions {
        match tx.status {
            TransactionStatus::New => histogram.new += 1,
            TransactionStatus::Processing => histogram.processing += 1,
            TransactionStatus::Ready => histogram.ready += 1,
            TransactionStatus::Done => histogram.done += 1,
            TransactionStatus::Cancelled => histogram.cancelled += 1,
        }
    }
    histogram
}

// =============================================================================
// Revenue / Outstanding / Collected
// =============================================================================

/// Start of the calendar day containing `as_of`, in `as_of`'s offset.
fn start_of_day(as_of: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let midnight = as_of.date_naive().and_time(NaiveTime::MIN);
    // A fixed offset has exactly one local interpretation.
    midnight
        .and_local_timezone(*as_of.offset())
        .single()
        .unwrap_or(as_of)
}

/// Revenue "today": sum of `total` for transactions that are `done` AND
/// whose `date_in` falls within `[local midnight, as_of]`.
///
/// ## Asymmetry (kept on purpose)
/// Filtering by `date_in` rather than `date_out` means an order finished
/// today but taken in yesterday is excluded, and one taken in today but
/// not yet finished is excluded too (status filter). Only orders both
/// started and completed "today" count. Dashboards downstream rely on
/// this exact definition; do not "fix" it here.
pub fn todays_revenue(
    transactions: &[LaundryTransaction],
    as_of: DateTime<FixedOffset>,
) -> Money {
    let window_start = start_of_day(as_of).with_timezone(&Utc);
    let window_end = as_of.with_timezone(&Utc);

    transactions
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Done)
        .filter(|tx| tx.date_in >= window_start && tx.date_in <= window_end)
        .map(|tx| tx.total())
        .sum()
}

/// Sum of `total` across all `done` transactions, unbounded by date.
pub fn total_revenue(transactions: &[LaundryTransaction]) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Done)
        .map(|tx| tx.total())
        .sum()
}

/// Sum of `total - paid` over transactions that still owe something.
pub fn outstanding_total(transactions: &[LaundryTransaction]) -> Money {
    transactions
        .iter()
        .filter(|tx| tx.paid_cents < tx.total_cents)
        .map(|tx| tx.total() - tx.paid())
        .sum()
}

/// Sum of `paid` over ALL transactions.
///
/// A partially-paid in-progress order still contributes its paid amount;
/// collection is about cash received, not order completion.
pub fn collected_total(transactions: &[LaundryTransaction]) -> Money {
    transactions.iter().map(|tx| tx.paid()).sum()
}

/// Mean `total` across all transactions; zero on an empty set.
pub fn average_transaction_value(transactions: &[LaundryTransaction]) -> Money {
    if transactions.is_empty() {
        return Money::zero();
    }
    let sum: i64 = transactions.iter().map(|tx| tx.total_cents).sum();
    Money::from_cents(sum / transactions.len() as i64)
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Everything the dashboard shows, derived in one pass set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub statuses: StatusHistogram,
    pub today_revenue: Money,
    pub total_revenue: Money,
    pub outstanding: Money,
    pub collected: Money,
    pub average_transaction_value: Money,
}

/// Folds the loaded transaction list into the dashboard numbers.
pub fn dashboard_summary(
    transactions: &[LaundryTransaction],
    as_of: DateTime<FixedOffset>,
) -> DashboardSummary {
    DashboardSummary {
        statuses: status_histogram(transactions),
        today_revenue: todays_revenue(transactions, as_of),
        total_revenue: total_revenue(transactions),
        outstanding: outstanding_total(transactions),
        collected: collected_total(transactions),
        average_transaction_value: average_transaction_value(transactions),
    }
}

// =============================================================================
// Service Popularity
// =============================================================================

/// Usage ranking entry for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePopularity {
    /// Service id; None when the lines only carry a snapshot.
    pub service_id: Option<String>,
    /// Display label: the first encountered snapshot name in the group.
    pub name: String,
    /// How many line items referenced the service.
    pub times_used: u64,
    /// Revenue from the lines' STORED subtotals — never recomputed from
    /// the service's current price.
    pub revenue: Money,
}

/// Ranks services by usage across every line item of every transaction.
///
/// Services with zero historical usage simply do not appear — they are
/// omitted from the ranking, not shown with a zero. Lines without a
/// resolvable `service_id` are merged into one snapshot-labelled bucket.
pub fn service_popularity(lines: &[TransactionLine]) -> Vec<ServicePopularity> {
    let mut groups: HashMap<Option<&str>, ServicePopularity> = HashMap::new();

    for line in lines {
        let key = line.service_id.as_deref();
        let entry = groups.entry(key).or_insert_with(|| ServicePopularity {
            service_id: line.service_id.clone(),
            name: line.display_name().to_string(),
            times_used: 0,
            revenue: Money::zero(),
        });
        entry.times_used += 1;
        entry.revenue += line.subtotal();
    }

    let mut ranking: Vec<ServicePopularity> = groups.into_values().collect();
    ranking.sort_by(|a, b| {
        b.times_used
            .cmp(&a.times_used)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.name.cmp(&b.name))
    });
    ranking
}

// =============================================================================
// Top Customers
// =============================================================================

/// Ranking entry for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomer {
    /// Customer id; None is the synthetic bucket for unlinked transactions.
    pub customer_id: Option<String>,
    /// Display label: the first encountered `customer_name` in the group.
    pub name: String,
    /// All transactions in the group, regardless of status.
    pub transaction_count: u64,
    /// Sum of `total` over `done` transactions only.
    pub done_revenue: Money,
}

/// Top customers by transaction count (descending), limited to
/// [`TOP_CUSTOMERS_LIMIT`].
///
/// Transactions with a null `customer_id` all land in ONE synthetic
/// bucket labelled by the first encountered `customer_name`. This merges
/// unrelated walk-ins and is an acknowledged lossy simplification kept
/// for behavioral parity with the dashboards built on it.
pub fn top_customers(transactions: &[LaundryTransaction]) -> Vec<TopCustomer> {
    let mut groups: HashMap<Option<&str>, TopCustomer> = HashMap::new();

    for tx in transactions {
        let key = tx.customer_id.as_deref();
        let entry = groups.entry(key).or_insert_with(|| TopCustomer {
            customer_id: tx.customer_id.clone(),
            name: tx.customer_name.clone(),
            transaction_count: 0,
            done_revenue: Money::zero(),
        });
        entry.transaction_count += 1;
        if tx.status == TransactionStatus::Done {
            entry.done_revenue += tx.total();
        }
    }

    let mut ranking: Vec<TopCustomer> = groups.into_values().collect();
    ranking.sort_by(|a, b| {
        b.transaction_count
            .cmp(&a.transaction_count)
            .then(b.done_revenue.cmp(&a.done_revenue))
            .then(a.name.cmp(&b.name))
    });
    ranking.truncate(TOP_CUSTOMERS_LIMIT);
    ranking
}

// =============================================================================
// Period Revenue Series
// =============================================================================

/// Lookback window selected by the report's period toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// Last 7 days, one bucket per day.
    Week,
    /// Last 4 weeks, one bucket per ISO week (labelled by its Monday).
    Month,
    /// Last 6 months, one bucket per calendar month.
    HalfYear,
    /// Last 2 years, one bucket per calendar year.
    TwoYears,
}

impl ReportPeriod {
    /// Start of the lookback window ending at `as_of`.
    fn window_start(&self, as_of: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            ReportPeriod::Week => as_of - Duration::days(7),
            ReportPeriod::Month => as_of - Duration::weeks(4),
            ReportPeriod::HalfYear => as_of
                .checked_sub_months(Months::new(6))
                .unwrap_or(as_of - Duration::days(183)),
            ReportPeriod::TwoYears => as_of
                .checked_sub_months(Months::new(24))
                .unwrap_or(as_of - Duration::days(730)),
        }
    }

    /// The representative date all of a bucket's transactions collapse to.
    fn bucket_date(&self, date: NaiveDate) -> NaiveDate {
        match self {
            ReportPeriod::Week => date,
            ReportPeriod::Month => {
                // Monday of the ISO week.
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            ReportPeriod::HalfYear => date.with_day(1).unwrap_or(date),
            ReportPeriod::TwoYears => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
            }
        }
    }

    /// Formats a bucket's label. The label is both the display key and the
    /// sort key: the series is ordered by re-parsing it (see
    /// [`Self::parse_label`]), so the two must stay format-compatible.
    fn bucket_label(&self, date: NaiveDate) -> String {
        match self {
            ReportPeriod::Week | ReportPeriod::Month => date.format("%d %b %Y").to_string(),
            ReportPeriod::HalfYear => date.format("%b %Y").to_string(),
            ReportPeriod::TwoYears => date.format("%Y").to_string(),
        }
    }

    /// Re-parses a bucket label back into its representative date.
    fn parse_label(&self, label: &str) -> Option<NaiveDate> {
        match self {
            ReportPeriod::Week | ReportPeriod::Month => {
                NaiveDate::parse_from_str(label, "%d %b %Y").ok()
            }
            ReportPeriod::HalfYear => {
                NaiveDate::parse_from_str(&format!("01 {label}"), "%d %b %Y").ok()
            }
            ReportPeriod::TwoYears => {
                let year: i32 = label.parse().ok()?;
                NaiveDate::from_ymd_opt(year, 1, 1)
            }
        }
    }
}

/// One bucket of the revenue series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Display label; also the sort key (re-parsed chronologically).
    pub label: String,
    pub revenue: Money,
}

/// Revenue over time: `done` transactions whose `date_in` falls in the
/// period's lookback window, grouped by the period's bucket key and
/// sorted chronologically by re-parsing each bucket's label.
pub fn revenue_series(
    transactions: &[LaundryTransaction],
    period: ReportPeriod,
    as_of: DateTime<FixedOffset>,
) -> Vec<RevenueBucket> {
    let window_start = period.window_start(as_of).with_timezone(&Utc);
    let window_end = as_of.with_timezone(&Utc);

    let mut buckets: HashMap<String, Money> = HashMap::new();
    for tx in transactions {
        if tx.status != TransactionStatus::Done {
            continue;
        }
        if tx.date_in < window_start || tx.date_in > window_end {
            continue;
        }
        let local_date = tx.date_in.with_timezone(as_of.offset()).date_naive();
        let label = period.bucket_label(period.bucket_date(local_date));
        *buckets.entry(label).or_insert_with(Money::zero) += tx.total();
    }

    let mut series: Vec<RevenueBucket> = buckets
        .into_iter()
        .map(|(label, revenue)| RevenueBucket { label, revenue })
        .collect();
    series.sort_by_key(|bucket| {
        let parsed = period.parse_label(&bucket.label);
        (parsed.is_none(), parsed)
    });
    series
}

// =============================================================================
// Unit Tests
// =============================================================================
