//! The Garden service.
//!
//! This module is the intermediary between the transport layers (REST and
//! SOAP) and the plant store. It owns the connection pool, bootstraps the
//! schema at startup, and runs the spreadsheet import pipeline:
//! decode rows -> reconcile against a snapshot -> apply atomically.
//!
//! The service instance is held behind an async mutex by the server, which
//! serializes imports: the "delete anything not seen" rule is only correct
//! when no other writer touches the collection between snapshot and commit.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::plant::{Plant, PlantFields};
use crate::domain::sync;
use crate::domain::sync::SourceRow;
use crate::infra::{config, spreadsheet};
use crate::storage::plants::{PgPlantStore, PlantStore, StoreError, SyncSummary};

/// Runs one full import pass against any store. Decoding never rejects a
/// row; only the store can fail, and then nothing has been committed.
pub async fn run_import(store: &dyn PlantStore, rows: &[SourceRow]) -> Result<SyncSummary, StoreError> {
    let candidates: Vec<_> = rows.iter().map(sync::decode).collect();
    let snapshot = store.list_all().await?;
    let plan = sync::reconcile(&candidates, &snapshot);
    store.apply_sync(&plan).await
}

pub struct GardenService {
    pool: PgPool,
    store: PgPlantStore,
}

impl GardenService {
    /// Connects to the database and creates the tables if needed.
    pub async fn new() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();
        let database_url = config::database_url();

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        Self::new_with_pool(pool).await
    }

    pub async fn new_with_pool(pool: PgPool) -> Result<Self, anyhow::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS plants (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                required_humidity INTEGER NOT NULL,
                last_watered TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS api_tokens (
                token TEXT PRIMARY KEY,
                username TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;

        let store = PgPlantStore::new(pool.clone());
        Ok(Self { pool, store })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn store(&self) -> &PgPlantStore {
        &self.store
    }

    // --- CRUD passthrough ---

    pub async fn list_plants(&self) -> Result<Vec<Plant>, StoreError> {
        self.store.list_all().await
    }

    pub async fn get_plant(&self, id: i32) -> Result<Option<Plant>, StoreError> {
        self.store.get(id).await
    }

    pub async fn create_plant(&self, fields: &PlantFields) -> Result<Plant, StoreError> {
        self.store.create(fields).await
    }

    pub async fn update_plant(&self, id: i32, fields: &PlantFields) -> Result<(), StoreError> {
        self.store.update_fields(id, fields).await
    }

    pub async fn delete_plant(&self, id: i32) -> Result<(), StoreError> {
        self.store.delete(id).await
    }

    // --- Spreadsheet import/export ---

    /// Full-replace import of an uploaded xlsx workbook.
    pub async fn import_workbook(&self, bytes: &[u8]) -> Result<SyncSummary, anyhow::Error> {
        let rows = spreadsheet::read_rows(bytes)?;
        let summary = run_import(&self.store, &rows).await?;
        Ok(summary)
    }

    /// Exports the whole collection as xlsx bytes.
    pub async fn export_workbook(&self) -> Result<Vec<u8>, anyhow::Error> {
        let plants = self.store.list_all().await?;
        spreadsheet::write_workbook(&plants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sync::Cell;
    use crate::storage::plants::MemoryPlantStore;
    use chrono::Utc;

    fn row(id: Cell, name: &str, location: &str, humidity: i64) -> SourceRow {
        SourceRow {
            id,
            name: Cell::Text(name.to_string()),
            location: Cell::Text(location.to_string()),
            humidity: Cell::Int(humidity),
        }
    }

    fn seeded(id: i32, name: &str, location: &str, humidity: i32) -> Plant {
        Plant {
            id,
            name: name.to_string(),
            location: location.to_string(),
            required_humidity: humidity,
            last_watered: Utc::now(),
        }
    }

    #[tokio::test]
    async fn worked_example_update_and_create() {
        let store = MemoryPlantStore::new();
        store.seed(seeded(1, "Rose", "Yard", 40)).await;

        let rows = vec![
            row(Cell::Int(1), "Rose", "Yard", 55),
            row(Cell::Int(0), "Tulip", "Bed", 30),
        ];

        let summary = run_import(&store, &rows).await.unwrap();
        assert_eq!(
            summary,
            SyncSummary {
                created: 1,
                updated: 1,
                deleted: 0
            }
        );

        let plants = store.list_all().await.unwrap();
        assert_eq!(plants.len(), 2);
        let rose = plants.iter().find(|p| p.id == 1).unwrap();
        assert_eq!(rose.required_humidity, 55);
        let tulip = plants.iter().find(|p| p.name == "Tulip").unwrap();
        assert!(tulip.id > 1, "store assigns a fresh id");
    }

    #[tokio::test]
    async fn plants_absent_from_input_are_deleted() {
        let store = MemoryPlantStore::new();
        store.seed(seeded(1, "Rose", "Yard", 40)).await;
        store.seed(seeded(2, "Fern", "Porch", 60)).await;

        let rows = vec![row(Cell::Int(1), "Rose", "Yard", 40)];

        let summary = run_import(&store, &rows).await.unwrap();
        assert_eq!(summary.deleted, 1);

        let plants = store.list_all().await.unwrap();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].id, 1);
    }

    #[tokio::test]
    async fn reimporting_the_export_is_idempotent() {
        let store = MemoryPlantStore::new();
        store.seed(seeded(1, "Rose", "Yard", 40)).await;
        store.seed(seeded(2, "Fern", "Porch", 60)).await;

        let rows = vec![
            row(Cell::Int(1), "Rose", "Yard", 40),
            row(Cell::Int(2), "Fern", "Porch", 60),
        ];

        let first = run_import(&store, &rows).await.unwrap();
        assert_eq!(first.updated, 2);

        let second = run_import(&store, &rows).await.unwrap();
        assert_eq!(
            second,
            SyncSummary {
                created: 0,
                updated: 2,
                deleted: 0
            }
        );
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_input_wipes_the_collection() {
        let store = MemoryPlantStore::new();
        store.seed(seeded(1, "Rose", "Yard", 40)).await;

        let summary = run_import(&store, &[]).await.unwrap();
        assert_eq!(summary.deleted, 1);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_id_becomes_a_fresh_create() {
        let store = MemoryPlantStore::new();

        let rows = vec![row(Cell::Int(99), "Cactus", "Shelf", 10)];
        let summary = run_import(&store, &rows).await.unwrap();
        assert_eq!(summary.created, 1);

        let plants = store.list_all().await.unwrap();
        assert_ne!(plants[0].id, 99, "declared id is never forced onto a create");
    }

    #[tokio::test]
    async fn malformed_cells_degrade_to_defaults_without_aborting() {
        let store = MemoryPlantStore::new();

        let rows = vec![SourceRow {
            id: Cell::Text("not-an-id".to_string()),
            name: Cell::Empty,
            location: Cell::Empty,
            humidity: Cell::Text("wet".to_string()),
        }];

        let summary = run_import(&store, &rows).await.unwrap();
        assert_eq!(summary.created, 1);

        let plants = store.list_all().await.unwrap();
        assert_eq!(plants[0].name, sync::DEFAULT_NAME);
        assert_eq!(plants[0].location, sync::DEFAULT_LOCATION);
        assert_eq!(plants[0].required_humidity, 0);
    }
}
