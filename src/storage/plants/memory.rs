use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::plant::{Plant, PlantFields};
use crate::domain::sync::SyncPlan;
use crate::storage::plants::{PlantStore, StoreError, SyncSummary};

/// In-memory plant store. Used by the engine's unit tests and handy for
/// demos; behaves like the Postgres store, including atomic plan
/// application (stage on a copy, swap only on success).
#[derive(Default)]
pub struct MemoryPlantStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    plants: BTreeMap<i32, Plant>,
    next_id: i32,
}

impl Inner {
    fn assign_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryPlantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a plant directly, bypassing id assignment. Test setup helper.
    pub async fn seed(&self, plant: Plant) {
        let mut inner = self.inner.lock().await;
        inner.next_id = inner.next_id.max(plant.id);
        inner.plants.insert(plant.id, plant);
    }
}

#[async_trait]
impl PlantStore for MemoryPlantStore {
    async fn list_all(&self) -> Result<Vec<Plant>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.plants.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Plant>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.plants.get(&id).cloned())
    }

    async fn create(&self, fields: &PlantFields) -> Result<Plant, StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.assign_id();
        let plant = Plant {
            id,
            name: fields.name.clone(),
            location: fields.location.clone(),
            required_humidity: fields.required_humidity,
            last_watered: Utc::now(),
        };
        inner.plants.insert(id, plant.clone());
        Ok(plant)
    }

    async fn update_fields(&self, id: i32, fields: &PlantFields) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let plant = inner.plants.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        plant.name = fields.name.clone();
        plant.location = fields.location.clone();
        plant.required_humidity = fields.required_humidity;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner
            .plants
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn apply_sync(&self, plan: &SyncPlan) -> Result<SyncSummary, StoreError> {
        let mut inner = self.inner.lock().await;

        // Stage everything on a copy; the live map is swapped only after the
        // whole plan has applied cleanly.
        let mut staged = inner.plants.clone();
        let mut next_id = inner.next_id;

        for fields in &plan.to_create {
            next_id += 1;
            staged.insert(
                next_id,
                Plant {
                    id: next_id,
                    name: fields.name.clone(),
                    location: fields.location.clone(),
                    required_humidity: fields.required_humidity,
                    last_watered: Utc::now(),
                },
            );
        }

        for (id, fields) in &plan.to_update {
            let plant = staged.get_mut(id).ok_or(StoreError::NotFound(*id))?;
            plant.name = fields.name.clone();
            plant.location = fields.location.clone();
            plant.required_humidity = fields.required_humidity;
        }

        for id in &plan.to_delete {
            staged.remove(id);
        }

        inner.plants = staged;
        inner.next_id = next_id;

        Ok(SyncSummary {
            created: plan.to_create.len() as u64,
            updated: plan.to_update.len() as u64,
            deleted: plan.to_delete.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fields(name: &str, location: &str, humidity: i32) -> PlantFields {
        PlantFields {
            name: name.to_string(),
            location: location.to_string(),
            required_humidity: humidity,
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_watering_timestamp() {
        let store = MemoryPlantStore::new();
        let a = store.create(&fields("Rose", "Yard", 40)).await.unwrap();
        let b = store.create(&fields("Fern", "Porch", 60)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn update_preserves_last_watered() {
        let store = MemoryPlantStore::new();
        let created = store.create(&fields("Rose", "Yard", 40)).await.unwrap();

        store
            .update_fields(created.id, &fields("Rose", "Yard", 55))
            .await
            .unwrap();

        let after = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(after.required_humidity, 55);
        assert_eq!(after.last_watered, created.last_watered);
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let store = MemoryPlantStore::new();
        let err = store.update_fields(9, &fields("X", "Y", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(9)));
    }

    #[tokio::test]
    async fn failed_apply_leaves_store_untouched() {
        let store = MemoryPlantStore::new();
        store.create(&fields("Rose", "Yard", 40)).await.unwrap();
        let before = store.list_all().await.unwrap();

        // Plan with creates, a delete, and one update aimed at a missing id:
        // the whole thing must roll back.
        let plan = SyncPlan {
            to_create: vec![fields("Tulip", "Bed", 30), fields("Cactus", "Shelf", 10)],
            to_update: vec![(42, fields("Ghost", "Nowhere", 0))],
            to_delete: HashSet::from([1]),
        };

        let err = store.apply_sync(&plan).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(42)));
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn apply_counts_match_plan_sizes() {
        let store = MemoryPlantStore::new();
        store.create(&fields("Rose", "Yard", 40)).await.unwrap();
        store.create(&fields("Fern", "Porch", 60)).await.unwrap();

        let plan = SyncPlan {
            to_create: vec![fields("Tulip", "Bed", 30)],
            to_update: vec![(1, fields("Rose", "Yard", 55))],
            to_delete: HashSet::from([2]),
        };

        let summary = store.apply_sync(&plan).await.unwrap();
        assert_eq!(
            summary,
            SyncSummary {
                created: 1,
                updated: 1,
                deleted: 1
            }
        );
    }
}
