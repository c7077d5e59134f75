//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## Deletion Semantics
//! Deleting a customer never deletes their transactions. The schema's
//! `ON DELETE SET NULL` nulls `transactions.customer_id`, and the
//! denormalized `customer_name` snapshot keeps history readable.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::watch::StoreEvents;
use suds_core::{validation, CoreResult, Customer, NewCustomer};

/// Business-rule checks shared by insert and update.
fn check_customer_input(name: &str, phone: Option<&str>) -> CoreResult<()> {
    validation::validate_name(name)?;
    if let Some(phone) = phone {
        validation::validate_phone(phone)?;
    }
    Ok(())
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
    events: Arc<StoreEvents>,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool, events: Arc<StoreEvents>) -> Self {
        CustomerRepository { pool, events }
    }

    /// Inserts a new customer and returns the stored record.
    ///
    /// Name and phone are validated first; a rejected input surfaces as
    /// [`DbError::Domain`] without touching the database.
    pub async fn insert(&self, new: NewCustomer) -> DbResult<Customer> {
        check_customer_input(&new.name, new.phone.as_deref())?;

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            phone: new.phone,
            address: new.address,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        self.events.bump_customers();
        Ok(customer)
    }

    /// Updates an existing customer's editable fields.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        check_customer_input(&customer.name, customer.phone.as_deref())?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                phone = ?3,
                address = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        self.events.bump_customers();
        Ok(())
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, created_at, updated_at
            FROM customers
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Deletes a customer.
    ///
    /// Transactions referencing the customer get their `customer_id` nulled
    /// by the schema (`ON DELETE SET NULL`); their `customer_name` snapshot
    /// stays. Both the customers table and the transactions table change,
    /// so both subscriber groups are woken.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.events.bump_customers();
        self.events.bump_transactions();
        Ok(())
    }

    /// Live subscription: yields the full customer list immediately, then a
    /// fresh full snapshot after every customers-table write.
    pub fn watch_all(&self) -> impl Stream<Item = DbResult<Vec<Customer>>> {
        let repo = self.clone();
        WatchStream::new(self.events.customers_rx()).then(move |_version| {
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            phone: Some("+62 812-0000-0000".to_string()),
            address: Some("Jl. Kenanga 5".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.customers();

        let created = repo.insert(new_customer("Siti Rahma")).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Siti Rahma");
        assert_eq!(fetched.phone.as_deref(), Some("+62 812-0000-0000"));
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let repo = db.customers();

        let mut customer = repo.insert(new_customer("Budi")).await.unwrap();
        customer.name = "Budi Santoso".to_string();
        customer.address = None;
        repo.update(&customer).await.unwrap();

        let fetched = repo.get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Budi Santoso");
        assert_eq!(fetched.address, None);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_input() {
        let db = test_db().await;
        let repo = db.customers();

        let err = repo
            .insert(NewCustomer {
                name: "   ".to_string(),
                phone: None,
                address: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(suds_core::CoreError::Validation(_))
        ));

        let err = repo
            .insert(NewCustomer {
                name: "Siti".to_string(),
                phone: Some("call me maybe".to_string()),
                address: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(suds_core::CoreError::Validation(_))
        ));

        // Nothing reached the table.
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_input() {
        let db = test_db().await;
        let repo = db.customers();

        let mut customer = repo.insert(new_customer("Budi")).await.unwrap();
        customer.name = "".to_string();

        let err = repo.update(&customer).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(suds_core::CoreError::Validation(_))
        ));

        let fetched = repo.get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Budi");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let repo = db.customers();

        let mut customer = repo.insert(new_customer("Budi")).await.unwrap();
        customer.id = "no-such-id".to_string();

        let err = repo.update(&customer).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(new_customer("Zulkifli")).await.unwrap();
        repo.insert(new_customer("ani")).await.unwrap();
        repo.insert(new_customer("Budi")).await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["ani", "Budi", "Zulkifli"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo.insert(new_customer("Siti")).await.unwrap();
        repo.delete(&customer.id).await.unwrap();

        assert!(repo.get_by_id(&customer.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&customer.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_watch_all_yields_snapshots() {
        let db = test_db().await;
        let repo = db.customers();

        let stream = repo.watch_all();
        tokio::pin!(stream);

        // Initial snapshot is empty.
        let initial = stream.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        repo.insert(new_customer("Siti")).await.unwrap();

        // The write wakes the stream with a fresh, replacing snapshot.
        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].name, "Siti");
    }
}
