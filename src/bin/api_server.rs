// src/bin/api_server.rs

use std::sync::Arc;
use smart_garden_api::infra::config;
use smart_garden_api::transport;
use smart_garden_api::GardenService;
use smart_garden_api::WeatherClient;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --- Service Initialization ---
    println!("> Initializing GardenService (connecting to Postgres, ensuring tables)...");
    let garden = GardenService::new().await?;
    println!("> GardenService initialized successfully.");

    let app_state = transport::http::AppState {
        garden: Arc::new(Mutex::new(garden)),
        weather: Arc::new(WeatherClient::new()),
    };

    // --- API Server Initialization ---
    println!("> Starting API server...");
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("> API server listening on http://{}", bind_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", bind_addr);
    println!("> SOAP endpoint at POST http://{}/soap", bind_addr);
    println!("> Press Ctrl+C to shut down");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            // An import in flight holds the service mutex until its
            // transaction commits or rolls back, so stopping here never
            // leaves a partial sync behind.
            println!("\n> Shutdown signal received (Ctrl+C), stopping.");
        }
    }

    Ok(())
}
