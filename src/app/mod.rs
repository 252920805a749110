pub mod auth;
pub mod garden_service;
