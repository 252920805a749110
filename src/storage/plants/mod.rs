//! Plant persistence seam.
//!
//! The store is the sole writer for the plant collection. `apply_sync` is
//! the applier stage of the import: it executes a whole [`SyncPlan`] as one
//! atomic unit, or leaves the collection untouched.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::plant::{Plant, PlantFields};
use crate::domain::sync::SyncPlan;

pub use memory::MemoryPlantStore;
pub use postgres::PgPlantStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Expected outcome for updates/deletes of ids that no longer exist,
    /// not an exceptional path.
    #[error("plant {0} not found")]
    NotFound(i32),
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Caller-visible result of one import: exact plan set sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct SyncSummary {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
}

#[async_trait]
pub trait PlantStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Plant>, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<Plant>, StoreError>;

    /// Assigns an id and a fresh `last_watered` timestamp.
    async fn create(&self, fields: &PlantFields) -> Result<Plant, StoreError>;

    /// Overwrites name/location/humidity only; `last_watered` is preserved.
    async fn update_fields(&self, id: i32, fields: &PlantFields) -> Result<(), StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// Applies a whole plan atomically: either every create, update and
    /// delete commits, or the collection is exactly as it was before.
    async fn apply_sync(&self, plan: &SyncPlan) -> Result<SyncSummary, StoreError>;
}
