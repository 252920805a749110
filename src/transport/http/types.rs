use crate::app::garden_service::GardenService;
use crate::infra::weather::WeatherClient;
use crate::storage::plants::StoreError;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    /// The mutex also serializes spreadsheet imports: the full-replace rule
    /// needs exclusive ownership of the collection from snapshot to commit.
    pub garden: Arc<Mutex<GardenService>>,
    pub weather: Arc<WeatherClient>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Import result: the summary counts plus a human-readable note that the
/// import replaced the whole collection.
#[derive(Serialize, Debug, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
}

pub fn store_error_response(err: StoreError) -> (StatusCode, Json<ApiResponse>) {
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(ApiResponse::err(err.to_string())))
}
