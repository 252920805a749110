use crate::domain::plant::PlantFields;
use crate::transport::http::types::{store_error_response, ApiResponse, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/plants",
    responses(
        (status = 200, description = "All plants", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn list_plants_handler(State(state): State<AppState>) -> impl IntoResponse {
    let garden = state.garden.lock().await;
    match garden.list_plants().await {
        Ok(plants) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "plants": plants }))),
        )
            .into_response(),
        Err(e) => store_error_response(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/plants",
    request_body = PlantFields,
    responses(
        (status = 201, description = "Plant created", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn create_plant_handler(
    State(state): State<AppState>,
    Json(fields): Json<PlantFields>,
) -> impl IntoResponse {
    let garden = state.garden.lock().await;
    match garden.create_plant(&fields).await {
        Ok(plant) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(serde_json::json!({ "plant": plant }))),
        )
            .into_response(),
        Err(e) => store_error_response(e).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/plants/{id}",
    request_body = PlantFields,
    params(("id" = i32, Path, description = "Plant id")),
    responses(
        (status = 204, description = "Plant updated"),
        (status = 404, description = "Unknown plant id", body = ApiResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn update_plant_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(fields): Json<PlantFields>,
) -> impl IntoResponse {
    let garden = state.garden.lock().await;
    match garden.update_plant(id, &fields).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/plants/{id}",
    params(("id" = i32, Path, description = "Plant id")),
    responses(
        (status = 204, description = "Plant deleted"),
        (status = 404, description = "Unknown plant id", body = ApiResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_plant_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let garden = state.garden.lock().await;
    match garden.delete_plant(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e).into_response(),
    }
}
