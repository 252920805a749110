use crate::transport::http::types::{ApiResponse, AppState, WeatherQuery};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/plants/weather-check",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Current temperature from the upstream weather service", body = ApiResponse)
    )
)]
pub async fn weather_check_handler(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> impl IntoResponse {
    let temperature = state.weather.garden_temperature(query.lat, query.lon).await;
    (
        StatusCode::OK,
        Json(ApiResponse::ok(serde_json::json!({
            "message": "External Weather Data",
            "temperature": temperature,
        }))),
    )
}
