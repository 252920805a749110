use crate::domain::plant::{Plant, PlantFields};
use crate::storage::plants::SyncSummary;
use crate::transport::http::auth_layer;
use crate::transport::http::handlers::{auth, health, plants, sync, weather};
use crate::transport::http::types::{
    ApiResponse, AppState, AuthRequest, ChangePasswordRequest, ImportResponse,
};
use crate::transport::soap;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        plants::list_plants_handler,
        plants::create_plant_handler,
        plants::update_plant_handler,
        plants::delete_plant_handler,
        sync::export_handler,
        sync::import_handler,
        weather::weather_check_handler,
        auth::register_handler,
        auth::login_handler,
        auth::change_password_handler,
        auth::delete_account_handler
    ),
    components(schemas(
        ApiResponse,
        Plant,
        PlantFields,
        SyncSummary,
        ImportResponse,
        AuthRequest,
        ChangePasswordRequest
    )),
    modifiers(&SecurityAddon)
)]
#[allow(dead_code)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    // Everything that reads or mutates the plant collection over REST
    // requires a bearer token; weather-check stays public like the rest.
    let protected = Router::new()
        .route(
            "/plants",
            get(plants::list_plants_handler).post(plants::create_plant_handler),
        )
        .route(
            "/plants/:id",
            put(plants::update_plant_handler).delete(plants::delete_plant_handler),
        )
        .route("/plants/export", get(sync::export_handler))
        .route("/plants/import", put(sync::import_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_layer::require_auth,
        ));

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/plants/weather-check", get(weather::weather_check_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/change-password", put(auth::change_password_handler))
        .route("/auth/delete", delete(auth::delete_account_handler))
        .route("/soap", post(soap::soap_handler))
        .merge(protected)
        .with_state(app_state)
}
