pub mod auth_layer;
pub mod handlers;
pub mod router;
pub mod types;

// Re-export the key entrypoints
pub use router::create_router;
pub use router::ApiDoc;
pub use types::AppState;
