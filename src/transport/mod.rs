pub mod http;
pub mod soap;
