use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::plant::{Plant, PlantFields};
use crate::domain::sync::SyncPlan;
use crate::storage::plants::{PlantStore, StoreError, SyncSummary};

/// Postgres-backed plant store. Plan application runs inside a single SQL
/// transaction so a failure anywhere rolls the whole import back.
#[derive(Clone)]
pub struct PgPlantStore {
    pool: PgPool,
}

impl PgPlantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PlantStore for PgPlantStore {
    async fn list_all(&self) -> Result<Vec<Plant>, StoreError> {
        let plants = sqlx::query_as::<_, Plant>(
            "SELECT id, name, location, required_humidity, last_watered FROM plants ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(plants)
    }

    async fn get(&self, id: i32) -> Result<Option<Plant>, StoreError> {
        let plant = sqlx::query_as::<_, Plant>(
            "SELECT id, name, location, required_humidity, last_watered FROM plants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(plant)
    }

    async fn create(&self, fields: &PlantFields) -> Result<Plant, StoreError> {
        let plant = sqlx::query_as::<_, Plant>(
            "INSERT INTO plants (name, location, required_humidity, last_watered) \
             VALUES ($1, $2, $3, now()) \
             RETURNING id, name, location, required_humidity, last_watered",
        )
        .bind(&fields.name)
        .bind(&fields.location)
        .bind(fields.required_humidity)
        .fetch_one(&self.pool)
        .await?;
        Ok(plant)
    }

    async fn update_fields(&self, id: i32, fields: &PlantFields) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE plants SET name = $1, location = $2, required_humidity = $3 WHERE id = $4",
        )
        .bind(&fields.name)
        .bind(&fields.location)
        .bind(fields.required_humidity)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn apply_sync(&self, plan: &SyncPlan) -> Result<SyncSummary, StoreError> {
        let mut tx = self.pool.begin().await?;

        for fields in &plan.to_create {
            sqlx::query(
                "INSERT INTO plants (name, location, required_humidity, last_watered) \
                 VALUES ($1, $2, $3, now())",
            )
            .bind(&fields.name)
            .bind(&fields.location)
            .bind(fields.required_humidity)
            .execute(&mut *tx)
            .await?;
        }

        for (id, fields) in &plan.to_update {
            let result = sqlx::query(
                "UPDATE plants SET name = $1, location = $2, required_humidity = $3 WHERE id = $4",
            )
            .bind(&fields.name)
            .bind(&fields.location)
            .bind(fields.required_humidity)
            .bind(*id)
            .execute(&mut *tx)
            .await?;

            // Can only happen if someone deleted the row after the snapshot
            // was taken; abandon the whole import rather than half-apply it.
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(StoreError::NotFound(*id));
            }
        }

        if !plan.to_delete.is_empty() {
            let ids: Vec<i32> = plan.to_delete.iter().copied().collect();
            sqlx::query("DELETE FROM plants WHERE id = ANY($1)")
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(SyncSummary {
            created: plan.to_create.len() as u64,
            updated: plan.to_update.len() as u64,
            deleted: plan.to_delete.len() as u64,
        })
    }
}
