//! Bearer-token middleware for the protected plant routes.
//!
//! Weather-check, health, auth and SOAP stay public; everything touching
//! the plant collection over REST requires a token issued by `/auth/login`.

use crate::app::auth;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return unauthorized("Missing bearer token");
    };

    let pool = {
        let garden = state.garden.lock().await;
        garden.pool().clone()
    };

    match auth::authenticate(&pool, token).await {
        Ok(Some(_username)) => next.run(request).await,
        Ok(None) => unauthorized("Invalid or expired token"),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::err(format!("Auth check failed: {}", e))),
        )
            .into_response(),
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ApiResponse::err(message))).into_response()
}
