//! Spreadsheet import/export endpoints.
//!
//! Import is a full replace: plants absent from the uploaded sheet are
//! deleted. The service mutex is held across the whole pass so no other
//! writer can slip between the snapshot and the commit.

use crate::transport::http::types::{ApiResponse, AppState, ImportResponse};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/plants/export",
    responses(
        (status = 200, description = "Xlsx workbook with the whole collection"),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let garden = state.garden.lock().await;
    match garden.export_workbook().await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                ),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"Garden.xlsx\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::err(format!("Export failed: {}", e))),
        )
            .into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/plants/import",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Import applied; counts returned. NOTE: full-replace — plants absent from the sheet are deleted", body = ImportResponse),
        (status = 400, description = "Empty or unreadable upload", body = ApiResponse),
        (status = 503, description = "Import aborted and rolled back", body = ApiResponse)
    ),
    security(("bearer_token" = []))
)]
pub async fn import_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err("No file uploaded.")),
        )
            .into_response();
    }

    let garden = state.garden.lock().await;
    match garden.import_workbook(&body).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ImportResponse {
                message: "Sincronização Completa.".to_string(),
                created: summary.created,
                updated: summary.updated,
                deleted: summary.deleted,
            }),
        )
            .into_response(),
        Err(e) => {
            // Unreadable workbook vs. store failure: the former is the
            // caller's fault, the latter aborts with everything rolled back.
            let status = if e.downcast_ref::<crate::storage::plants::StoreError>().is_some() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::BAD_REQUEST
            };
            (
                status,
                Json(ApiResponse::err(format!("Import failed, no changes applied: {}", e))),
            )
                .into_response()
        }
    }
}
