pub mod config;
pub mod spreadsheet;
pub mod weather;
