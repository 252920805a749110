pub mod auth;
pub mod health;
pub mod plants;
pub mod sync;
pub mod weather;
