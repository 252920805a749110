pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::garden_service::GardenService;
pub use domain::plant::{Plant, PlantFields};
pub use domain::sync::{decode, reconcile, SourceRow, SyncPlan};
pub use infra::weather::WeatherClient;
pub use storage::plants::{MemoryPlantStore, PgPlantStore, PlantStore, StoreError, SyncSummary};
