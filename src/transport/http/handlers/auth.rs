use crate::app::auth;
use crate::app::auth::AuthError;
use crate::transport::http::types::{ApiResponse, AppState, AuthRequest, ChangePasswordRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

fn auth_error_response(err: AuthError, unauthorized: bool) -> Response {
    let status = match err {
        AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AuthError::InvalidCredentials if unauthorized => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(ApiResponse::err(err.to_string()))).into_response()
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Account created", body = ApiResponse),
        (status = 400, description = "Username already exists", body = ApiResponse)
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> impl IntoResponse {
    let pool = state.garden.lock().await.pool().clone();
    match auth::register(&pool, &req.username, &req.password).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({
                "message": "Utilizador criado com sucesso."
            }))),
        )
            .into_response(),
        Err(e) => auth_error_response(e, false),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = ApiResponse),
        (status = 401, description = "Invalid username or password", body = ApiResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> impl IntoResponse {
    let pool = state.garden.lock().await.pool().clone();
    match auth::login(&pool, &req.username, &req.password).await {
        Ok(token) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "token": token }))),
        )
            .into_response(),
        Err(e) => auth_error_response(e, true),
    }
}

#[utoipa::path(
    put,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse),
        (status = 400, description = "Invalid credentials", body = ApiResponse)
    )
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    let pool = state.garden.lock().await.pool().clone();
    match auth::change_password(&pool, &req.username, &req.old_password, &req.new_password).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({
                "message": "Password atualizada."
            }))),
        )
            .into_response(),
        Err(e) => auth_error_response(e, false),
    }
}

#[utoipa::path(
    delete,
    path = "/auth/delete",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse),
        (status = 400, description = "Invalid credentials", body = ApiResponse)
    )
)]
pub async fn delete_account_handler(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> impl IntoResponse {
    let pool = state.garden.lock().await.pool().clone();
    match auth::delete_account(&pool, &req.username, &req.password).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({
                "message": "Conta eliminada."
            }))),
        )
            .into_response(),
        Err(e) => auth_error_response(e, false),
    }
}
