//! # Transaction Repository
//!
//! Database operations for laundry transactions, their line items,
//! payments, and status changes.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_with_lines   INSERT parent + N lines      one SQL transaction   │
//! │  update_with_lines   DELETE old lines, INSERT     one SQL transaction   │
//! │                      new set, UPDATE parent                             │
//! │  add_payment         validate → paid += amount    single statement      │
//! │  update_status       transition table → UPDATE    single statement      │
//! │  delete              parent row; lines cascade    single statement      │
//! │                                                                         │
//! │  The stored total is always Σ of the line subtotals written in the      │
//! │  same SQL transaction: readers never observe a mismatched pair.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::watch::StoreEvents;
use suds_core::{
    validate_payment_amount, validation, CoreError, CoreResult, LaundryTransaction, Money,
    NewLine, NewTransaction, PaymentCheck, TransactionLine, TransactionStatus,
    TransactionWithLines,
};

/// Business-rule checks on a transaction header and its line inputs,
/// applied by both create and update before any SQL runs.
fn check_transaction_input(header: &NewTransaction, lines: &[NewLine]) -> CoreResult<()> {
    validation::validate_name(&header.customer_name)?;
    if let Some(customer_id) = &header.customer_id {
        validation::validate_uuid(customer_id)?;
    }
    for line in lines {
        validation::validate_quantity(line.quantity)?;
        validation::validate_price_cents(line.unit_price_cents)?;
        if let Some(service_id) = &line.service_id {
            validation::validate_uuid(service_id)?;
        }
    }
    Ok(())
}

const TX_COLUMNS: &str = "id, customer_id, customer_name, total_cents, paid_cents, status, \
                          date_in, date_out, estimated_date, created_at, updated_at";

const LINE_COLUMNS: &str = "id, transaction_id, service_id, service_name, unit_price_cents, \
                            unit, quantity, subtotal_cents, created_at";

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
    events: Arc<StoreEvents>,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool, events: Arc<StoreEvents>) -> Self {
        TransactionRepository { pool, events }
    }

    /// Creates a transaction and its line items atomically.
    ///
    /// The stored total is the sum of the line subtotals, each computed
    /// once here from the snapshot price and quantity. Status starts at
    /// `new`, paid at zero.
    pub async fn create_with_lines(
        &self,
        new: NewTransaction,
        lines: Vec<NewLine>,
    ) -> DbResult<TransactionWithLines> {
        check_transaction_input(&new, &lines)?;

        let now = Utc::now();
        let total: Money = lines.iter().map(|l| l.subtotal()).sum();

        let transaction = LaundryTransaction {
            id: Uuid::new_v4().to_string(),
            customer_id: new.customer_id,
            customer_name: new.customer_name,
            total_cents: total.cents(),
            paid_cents: 0,
            status: TransactionStatus::New,
            date_in: new.date_in,
            date_out: None,
            estimated_date: new.estimated_date,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %transaction.id,
            lines = lines.len(),
            total_cents = transaction.total_cents,
            "Creating transaction"
        );

        let mut db_tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, customer_id, customer_name, total_cents, paid_cents, status,
                 date_in, date_out, estimated_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.customer_id)
        .bind(&transaction.customer_name)
        .bind(transaction.total_cents)
        .bind(transaction.paid_cents)
        .bind(transaction.status)
        .bind(transaction.date_in)
        .bind(transaction.date_out)
        .bind(transaction.estimated_date)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *db_tx)
        .await?;

        let mut stored_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let stored = TransactionLine {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction.id.clone(),
                service_id: line.service_id,
                service_name: line.service_name,
                unit_price_cents: line.unit_price_cents,
                unit: line.unit,
                quantity: line.quantity,
                subtotal_cents: Money::from_cents(line.unit_price_cents)
                    .multiply_quantity(line.quantity)
                    .cents(),
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO transaction_lines
                    (id, transaction_id, service_id, service_name, unit_price_cents,
                     unit, quantity, subtotal_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&stored.id)
            .bind(&stored.transaction_id)
            .bind(&stored.service_id)
            .bind(&stored.service_name)
            .bind(stored.unit_price_cents)
            .bind(stored.unit)
            .bind(stored.quantity)
            .bind(stored.subtotal_cents)
            .bind(stored.created_at)
            .execute(&mut *db_tx)
            .await?;

            stored_lines.push(stored);
        }

        db_tx.commit().await?;

        self.events.bump_transactions();
        Ok(TransactionWithLines {
            transaction,
            lines: stored_lines,
        })
    }

    /// Rewrites a transaction's header fields and replaces its entire line
    /// set, atomically.
    ///
    /// The old lines are deleted and the new set inserted in the same SQL
    /// transaction; the stored total is recomputed from the new lines.
    /// Paid amount, status, and date_out are untouched; payments and
    /// lifecycle have their own write paths.
    pub async fn update_with_lines(
        &self,
        id: &str,
        header: NewTransaction,
        lines: Vec<NewLine>,
    ) -> DbResult<TransactionWithLines> {
        check_transaction_input(&header, &lines)?;

        let now = Utc::now();
        let total: Money = lines.iter().map(|l| l.subtotal()).sum();

        debug!(id = %id, lines = lines.len(), "Replacing transaction lines");

        let mut db_tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                customer_id = ?2,
                customer_name = ?3,
                total_cents = ?4,
                date_in = ?5,
                estimated_date = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&header.customer_id)
        .bind(&header.customer_name)
        .bind(total.cents())
        .bind(header.date_in)
        .bind(header.estimated_date)
        .bind(now)
        .execute(&mut *db_tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        sqlx::query("DELETE FROM transaction_lines WHERE transaction_id = ?1")
            .bind(id)
            .execute(&mut *db_tx)
            .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines
                    (id, transaction_id, service_id, service_name, unit_price_cents,
                     unit, quantity, subtotal_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(id)
            .bind(&line.service_id)
            .bind(&line.service_name)
            .bind(line.unit_price_cents)
            .bind(line.unit)
            .bind(line.quantity)
            .bind(line.subtotal().cents())
            .bind(now)
            .execute(&mut *db_tx)
            .await?;
        }

        db_tx.commit().await?;
        self.events.bump_transactions();

        self.get_with_lines(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Gets a transaction by ID, without its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LaundryTransaction>> {
        let tx = sqlx::query_as::<_, LaundryTransaction>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    /// Gets a transaction together with its line items.
    pub async fn get_with_lines(&self, id: &str) -> DbResult<Option<TransactionWithLines>> {
        let Some(transaction) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let lines = self.list_lines(id).await?;
        Ok(Some(TransactionWithLines { transaction, lines }))
    }

    /// Lists all transactions, newest intake first.
    pub async fn list_all(&self) -> DbResult<Vec<LaundryTransaction>> {
        let txs = sqlx::query_as::<_, LaundryTransaction>(&format!(
            "SELECT {TX_COLUMNS} FROM transactions ORDER BY date_in DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(txs)
    }

    /// Lists the line items of one transaction, in entry order.
    pub async fn list_lines(&self, transaction_id: &str) -> DbResult<Vec<TransactionLine>> {
        let lines = sqlx::query_as::<_, TransactionLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM transaction_lines \
             WHERE transaction_id = ?1 ORDER BY created_at, id"
        ))
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists every line item in the store. Feeds the service-popularity
    /// report, which aggregates over stored snapshots.
    pub async fn list_all_lines(&self) -> DbResult<Vec<TransactionLine>> {
        let lines = sqlx::query_as::<_, TransactionLine>(&format!(
            "SELECT {LINE_COLUMNS} FROM transaction_lines ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Deletes a transaction. Its lines go with it (schema cascade).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting transaction");

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        self.events.bump_transactions();
        Ok(())
    }

    /// Records an additional payment and returns the updated transaction.
    ///
    /// Malformed amounts (zero, negative) are rejected. An amount that
    /// pushes `paid` past `total` is applied as-is; the overpayment policy
    /// belongs to the caller, who validated and chose to proceed.
    ///
    /// The UPDATE is relative (`paid_cents = paid_cents + amount`), never
    /// an absolute value computed from an earlier read: `paid` is the
    /// cumulative sum of applied payments, and two cashiers recording
    /// installments at the same moment must both land.
    pub async fn add_payment(&self, id: &str, amount: Money) -> DbResult<LaundryTransaction> {
        let tx = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))?;

        match validate_payment_amount(tx.paid(), amount, tx.total()) {
            PaymentCheck::Invalid(reason) => {
                return Err(DbError::Domain(CoreError::InvalidPaymentAmount {
                    reason: reason.to_string(),
                }));
            }
            PaymentCheck::Valid | PaymentCheck::Overpayment { .. } => {}
        }

        debug!(id = %id, amount_cents = amount.cents(), "Recording payment");

        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                paid_cents = paid_cents + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        self.events.bump_transactions();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Moves a transaction to the next lifecycle status.
    ///
    /// The transition is checked against the allowed table; an illegal move
    /// is rejected without touching the row. Entering `done` stamps
    /// `date_out`; no other transition does, including `cancelled`.
    ///
    /// The UPDATE is guarded on the status the check ran against. If a
    /// concurrent writer moved the order in between, zero rows match and
    /// the call fails with the transition from the fresh status instead of
    /// silently overwriting it (a cancelled order can never be clobbered
    /// back to `ready` by a racing click).
    pub async fn update_status(
        &self,
        id: &str,
        next: TransactionStatus,
    ) -> DbResult<LaundryTransaction> {
        let tx = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))?;

        tx.status.check_transition(next)?;

        let now = Utc::now();
        let date_out = if next == TransactionStatus::Done {
            Some(now)
        } else {
            tx.date_out
        };

        debug!(id = %id, from = tx.status.as_str(), to = next.as_str(), "Status change");

        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                status = ?2,
                date_out = ?3,
                updated_at = ?4
            WHERE id = ?1 AND status = ?5
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(date_out)
        .bind(now)
        .bind(tx.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // The row vanished or another writer changed the status after
            // our read. Reject against the current state.
            let current = self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Transaction", id))?;
            return Err(DbError::Domain(CoreError::IllegalStatusTransition {
                from: current.status.as_str(),
                to: next.as_str(),
            }));
        }

        self.events.bump_transactions();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Live subscription: yields the full transaction list immediately,
    /// then a fresh full snapshot after every transactions-table write.
    pub fn watch_all(&self) -> impl Stream<Item = DbResult<Vec<LaundryTransaction>>> {
        let repo = self.clone();
        WatchStream::new(self.events.transactions_rx()).then(move |_version| {
            let repo = repo.clone();
            async move { repo.list_all().await }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use suds_core::{NewCustomer, NewService, Service, ServiceUnit};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_service(db: &Database, name: &str, price_cents: i64, unit: ServiceUnit) -> Service {
        db.services()
            .insert(NewService {
                name: name.to_string(),
                price_cents,
                unit,
            })
            .await
            .unwrap()
    }

    fn header(customer_id: Option<String>, name: &str) -> NewTransaction {
        NewTransaction {
            customer_id,
            customer_name: name.to_string(),
            date_in: Utc::now(),
            estimated_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_lines_roundtrip() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash & Fold", 700, ServiceUnit::Kg).await;
        let duvet = seed_service(&db, "Duvet Cleaning", 2500, ServiceUnit::Item).await;

        let created = repo
            .create_with_lines(
                header(None, "Walk-in"),
                vec![
                    NewLine::for_service(&wash, 3.5),
                    NewLine::for_service(&duvet, 2.0),
                ],
            )
            .await
            .unwrap();

        // 3.5 * 700 = 2450, 2 * 2500 = 5000
        assert_eq!(created.transaction.total_cents, 7450);
        assert_eq!(created.transaction.paid_cents, 0);
        assert_eq!(created.transaction.status, TransactionStatus::New);
        assert_eq!(created.lines.len(), 2);

        let fetched = repo
            .get_with_lines(&created.transaction.id)
            .await
            .unwrap()
            .unwrap();
        let line_sum: i64 = fetched.lines.iter().map(|l| l.subtotal_cents).sum();
        assert_eq!(line_sum, fetched.transaction.total_cents);
    }

    #[tokio::test]
    async fn test_update_with_lines_replaces_set() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash & Fold", 700, ServiceUnit::Kg).await;
        let iron = seed_service(&db, "Ironing", 300, ServiceUnit::Kg).await;

        let created = repo
            .create_with_lines(
                header(None, "Siti"),
                vec![NewLine::for_service(&wash, 2.0)],
            )
            .await
            .unwrap();

        let updated = repo
            .update_with_lines(
                &created.transaction.id,
                header(None, "Siti Rahma"),
                vec![
                    NewLine::for_service(&iron, 4.0),
                    NewLine::for_service(&wash, 1.0),
                ],
            )
            .await
            .unwrap();

        assert_eq!(updated.transaction.customer_name, "Siti Rahma");
        assert_eq!(updated.transaction.total_cents, 4 * 300 + 700);
        assert_eq!(updated.lines.len(), 2);

        // No orphans from the old line set.
        let all_lines = repo.list_all_lines().await.unwrap();
        assert_eq!(all_lines.len(), 2);
        assert!(all_lines
            .iter()
            .all(|l| l.transaction_id == created.transaction.id));
    }

    #[tokio::test]
    async fn test_update_with_lines_missing_is_not_found() {
        let db = test_db().await;
        let repo = db.transactions();

        let err = repo
            .update_with_lines("no-such-id", header(None, "Nobody"), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_line_price_snapshot_survives_service_changes() {
        let db = test_db().await;
        let repo = db.transactions();
        let services = db.services();

        let mut wash = seed_service(&db, "Wash & Fold", 700, ServiceUnit::Kg).await;

        let created = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 2.0)])
            .await
            .unwrap();

        wash.price_cents = 900;
        services.update(&wash).await.unwrap();
        services.deactivate(&wash.id).await.unwrap();

        let fetched = repo
            .get_with_lines(&created.transaction.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.lines[0].unit_price_cents, 700);
        assert_eq!(fetched.lines[0].subtotal_cents, 1400);
        assert_eq!(fetched.transaction.total_cents, 1400);
    }

    #[tokio::test]
    async fn test_customer_delete_nulls_link_keeps_snapshot() {
        let db = test_db().await;
        let repo = db.transactions();
        let customers = db.customers();

        let customer = customers
            .insert(NewCustomer {
                name: "Siti Rahma".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let created = repo
            .create_with_lines(
                header(Some(customer.id.clone()), &customer.name),
                vec![],
            )
            .await
            .unwrap();

        customers.delete(&customer.id).await.unwrap();

        let fetched = repo.get_by_id(&created.transaction.id).await.unwrap().unwrap();
        assert_eq!(fetched.customer_id, None);
        assert_eq!(fetched.customer_name, "Siti Rahma");
    }

    #[tokio::test]
    async fn test_add_payment_installments() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash & Fold", 50_000, ServiceUnit::Kg).await;
        let created = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 2.0)])
            .await
            .unwrap();
        let id = created.transaction.id;

        let after_first = repo.add_payment(&id, Money::from_cents(40_000)).await.unwrap();
        assert_eq!(after_first.paid_cents, 40_000);
        assert_eq!(after_first.remaining().cents(), 60_000);

        let after_second = repo.add_payment(&id, Money::from_cents(60_000)).await.unwrap();
        assert_eq!(after_second.paid_cents, 100_000);
        assert_eq!(after_second.remaining().cents(), 0);
    }

    #[tokio::test]
    async fn test_add_payment_rejects_zero_and_negative() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash", 1000, ServiceUnit::Kg).await;
        let created = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 1.0)])
            .await
            .unwrap();
        let id = created.transaction.id;

        for bad in [Money::zero(), Money::from_cents(-5)] {
            let err = repo.add_payment(&id, bad).await.unwrap_err();
            assert!(matches!(
                err,
                DbError::Domain(CoreError::InvalidPaymentAmount { .. })
            ));
        }

        // Nothing was applied.
        let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.paid_cents, 0);
    }

    #[tokio::test]
    async fn test_concurrent_payments_both_land() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash", 50_000, ServiceUnit::Kg).await;
        let created = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 2.0)])
            .await
            .unwrap();
        let id = created.transaction.id;

        // Two cashiers record installments at the same moment. paid is the
        // cumulative sum of applied payments; neither write may be lost.
        let repo_a = repo.clone();
        let repo_b = repo.clone();
        let (a, b) = tokio::join!(
            repo_a.add_payment(&id, Money::from_cents(40_000)),
            repo_b.add_payment(&id, Money::from_cents(60_000)),
        );
        a.unwrap();
        b.unwrap();

        let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.paid_cents, 100_000);
    }

    #[tokio::test]
    async fn test_concurrent_status_writes_only_one_wins() {
        let db = test_db().await;
        let repo = db.transactions();

        let created = repo
            .create_with_lines(header(None, "Budi"), vec![])
            .await
            .unwrap();
        let id = created.transaction.id;

        // Two racing requests for the same forward step: whichever lands
        // first wins, the other is rejected against the fresh status
        // (processing -> processing is not in the table).
        let repo_a = repo.clone();
        let repo_b = repo.clone();
        let (a, b) = tokio::join!(
            repo_a.update_status(&id, TransactionStatus::Processing),
            repo_b.update_status(&id, TransactionStatus::Processing),
        );
        assert!(a.is_ok() != b.is_ok());

        let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TransactionStatus::Processing);
        assert!(fetched.date_out.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash", 1000, ServiceUnit::Kg).await;

        // Zero-weight line.
        let err = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 0.0)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(_))
        ));

        // Malformed customer reference.
        let err = repo
            .create_with_lines(
                header(Some("not-a-uuid".to_string()), "Budi"),
                vec![NewLine::for_service(&wash, 1.0)],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(_))
        ));

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_payment_overpayment_is_applied_not_clamped() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash", 1000, ServiceUnit::Kg).await;
        let created = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 1.0)])
            .await
            .unwrap();

        let after = repo
            .add_payment(&created.transaction.id, Money::from_cents(1500))
            .await
            .unwrap();
        assert_eq!(after.paid_cents, 1500);
        assert_eq!(after.remaining().cents(), 0);
    }

    #[tokio::test]
    async fn test_status_progression_stamps_date_out_on_done() {
        let db = test_db().await;
        let repo = db.transactions();

        let created = repo
            .create_with_lines(header(None, "Budi"), vec![])
            .await
            .unwrap();
        let id = created.transaction.id;

        let tx = repo.update_status(&id, TransactionStatus::Processing).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Processing);
        assert!(tx.date_out.is_none());

        let tx = repo.update_status(&id, TransactionStatus::Ready).await.unwrap();
        assert!(tx.date_out.is_none());

        let tx = repo.update_status(&id, TransactionStatus::Done).await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Done);
        assert!(tx.date_out.is_some());
    }

    #[tokio::test]
    async fn test_illegal_transition_rejected_without_write() {
        let db = test_db().await;
        let repo = db.transactions();

        let created = repo
            .create_with_lines(header(None, "Budi"), vec![])
            .await
            .unwrap();
        let id = created.transaction.id;

        // Skipping straight from new to done is not allowed.
        let err = repo
            .update_status(&id, TransactionStatus::Done)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::IllegalStatusTransition { .. })
        ));

        let fetched = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.status, TransactionStatus::New);
        assert!(fetched.date_out.is_none());
    }

    #[tokio::test]
    async fn test_cancel_does_not_stamp_date_out() {
        let db = test_db().await;
        let repo = db.transactions();

        let created = repo
            .create_with_lines(header(None, "Budi"), vec![])
            .await
            .unwrap();

        let tx = repo
            .update_status(&created.transaction.id, TransactionStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Cancelled);
        assert!(tx.date_out.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_lines() {
        let db = test_db().await;
        let repo = db.transactions();

        let wash = seed_service(&db, "Wash", 1000, ServiceUnit::Kg).await;
        let created = repo
            .create_with_lines(header(None, "Budi"), vec![NewLine::for_service(&wash, 1.0)])
            .await
            .unwrap();

        repo.delete(&created.transaction.id).await.unwrap();

        assert!(repo.get_by_id(&created.transaction.id).await.unwrap().is_none());
        assert!(repo.list_all_lines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let db = test_db().await;
        let repo = db.transactions();

        let older = NewTransaction {
            customer_id: None,
            customer_name: "Older".to_string(),
            date_in: Utc::now() - chrono::Duration::days(2),
            estimated_date: None,
        };
        let newer = NewTransaction {
            customer_id: None,
            customer_name: "Newer".to_string(),
            date_in: Utc::now(),
            estimated_date: None,
        };

        repo.create_with_lines(older, vec![]).await.unwrap();
        repo.create_with_lines(newer, vec![]).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all[0].customer_name, "Newer");
        assert_eq!(all[1].customer_name, "Older");
    }

    #[tokio::test]
    async fn test_watch_all_yields_snapshots() {
        let db = test_db().await;
        let repo = db.transactions();

        let stream = repo.watch_all();
        tokio::pin!(stream);

        let initial = stream.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        repo.create_with_lines(header(None, "Budi"), vec![])
            .await
            .unwrap();

        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].customer_name, "Budi");
    }
}
