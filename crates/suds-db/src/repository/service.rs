//! # Service Repository
//!
//! Database operations for the price list.
//!
//! ## Soft Deactivation
//! Services are never hard-deleted. Deactivating a service hides it from
//! the active price list but keeps the row, so historical transaction
//! lines keep a resolvable `service_id` alongside their snapshots.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::watch::StoreEvents;
use suds_core::{validation, CoreResult, NewService, Service};

/// Business-rule checks shared by insert and update.
fn check_service_input(name: &str, price_cents: i64) -> CoreResult<()> {
    validation::validate_name(name)?;
    validation::validate_price_cents(price_cents)?;
    Ok(())
}

/// Repository for price-list database operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
    events: Arc<StoreEvents>,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool, events: Arc<StoreEvents>) -> Self {
        ServiceRepository { pool, events }
    }

    /// Inserts a new service, active by default.
    ///
    /// Name and price are validated first; the price list has no free or
    /// negative-priced services.
    pub async fn insert(&self, new: NewService) -> DbResult<Service> {
        check_service_input(&new.name, new.price_cents)?;

        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            price_cents: new.price_cents,
            unit: new.unit,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %service.id, name = %service.name, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (id, name, price_cents, unit, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.price_cents)
        .bind(service.unit)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        self.events.bump_services();
        Ok(service)
    }

    /// Updates a service's name, price, unit, and active flag.
    ///
    /// Price changes only affect future transaction lines; existing lines
    /// carry their own price snapshots.
    pub async fn update(&self, service: &Service) -> DbResult<()> {
        check_service_input(&service.name, service.price_cents)?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE services SET
                name = ?2,
                price_cents = ?3,
                unit = ?4,
                is_active = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.price_cents)
        .bind(service.unit)
        .bind(service.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", &service.id));
        }

        self.events.bump_services();
        Ok(())
    }

    /// Gets a service by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, price_cents, unit, is_active, created_at, updated_at
            FROM services
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Lists all services including deactivated ones, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, price_cents, unit, is_active, created_at, updated_at
            FROM services
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Lists only active services. This is the price list shown when
    /// composing a new transaction.
    pub async fn list_active(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, name, price_cents, unit, is_active, created_at, updated_at
            FROM services
            WHERE is_active = 1
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Sets a service's active flag.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id = %id, active = active, "Setting service active flag");

        let result = sqlx::query(
            "UPDATE services SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        self.events.bump_services();
        Ok(())
    }

    /// Deactivates a service. The row stays; historical lines keep their
    /// reference and snapshots.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        self.set_active(id, false).await
    }

    /// Live subscription: yields the full service list immediately, then a
    /// fresh full snapshot after every services-table write.
    pub fn watch_all(&self) -> impl Stream<Item = DbResult<Vec<Service>>> {
        let repo = self.clone();
        WatchStream::new(self.events.services_rx()).then(move |_version| {
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
    use suds_core::ServiceUnit;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn wash_and_fold() -> NewService {
        NewService {
            name: "Wash & Fold".to_string(),
            price_cents: 700,
            unit: ServiceUnit::Kg,
        }
    }

    #[tokio::test]
    async fn test_insert_is_active_by_default() {
        let db = test_db().await;
        let repo = db.services();

        let service = repo.insert(wash_and_fold()).await.unwrap();
        assert!(service.is_active);

        let fetched = repo.get_by_id(&service.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 700);
        assert_eq!(fetched.unit, ServiceUnit::Kg);
    }

    #[tokio::test]
    async fn test_update_price() {
        let db = test_db().await;
        let repo = db.services();

        let mut service = repo.insert(wash_and_fold()).await.unwrap();
        service.price_cents = 850;
        repo.update(&service).await.unwrap();

        let fetched = repo.get_by_id(&service.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 850);
    }

    #[tokio::test]
    async fn test_insert_rejects_nonpositive_price() {
        let db = test_db().await;
        let repo = db.services();

        for bad_price in [0, -700] {
            let err = repo
                .insert(NewService {
                    name: "Wash & Fold".to_string(),
                    price_cents: bad_price,
                    unit: ServiceUnit::Kg,
                })
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DbError::Domain(suds_core::CoreError::Validation(_))
            ));
        }

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_input() {
        let db = test_db().await;
        let repo = db.services();

        let mut service = repo.insert(wash_and_fold()).await.unwrap();
        service.price_cents = -1;

        let err = repo.update(&service).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(suds_core::CoreError::Validation(_))
        ));

        let fetched = repo.get_by_id(&service.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 700);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_active_list() {
        let db = test_db().await;
        let repo = db.services();

        let wash = repo.insert(wash_and_fold()).await.unwrap();
        repo.insert(NewService {
            name: "Duvet Cleaning".to_string(),
            price_cents: 2500,
            unit: ServiceUnit::Item,
        })
        .await
        .unwrap();

        repo.deactivate(&wash.id).await.unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Duvet Cleaning");

        // Still present in the full list and fetchable by id.
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
        let fetched = repo.get_by_id(&wash.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn test_set_active_missing_is_not_found() {
        let db = test_db().await;
        let repo = db.services();

        let err = repo.deactivate("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_watch_all_yields_snapshots() {
        let db = test_db().await;
        let repo = db.services();

        let stream = repo.watch_all();
        tokio::pin!(stream);

        let initial = stream.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        repo.insert(wash_and_fold()).await.unwrap();

        let next = stream.next().await.unwrap().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].name, "Wash & Fold");
    }
}
