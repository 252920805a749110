use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted plant. Identity and `last_watered` are assigned by the store
/// on create; updates overwrite the other fields only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Plant {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub required_humidity: i32,
    pub last_watered: DateTime<Utc>,
}

/// The caller-writable fields of a plant (everything except identity and the
/// watering timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlantFields {
    pub name: String,
    pub location: String,
    pub required_humidity: i32,
}

impl Plant {
    pub fn fields(&self) -> PlantFields {
        PlantFields {
            name: self.name.clone(),
            location: self.location.clone(),
            required_humidity: self.required_humidity,
        }
    }
}
