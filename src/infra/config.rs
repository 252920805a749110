//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Address the API server binds to.
pub fn bind_addr() -> String {
    std::env::var("GARDEN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// Weather API base URL (Open-Meteo by default; override in tests).
pub fn weather_api_url() -> String {
    std::env::var("WEATHER_API_URL").unwrap_or_else(|_| "https://api.open-meteo.com".to_string())
}
