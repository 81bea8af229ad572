pub mod config;
pub mod diag;
pub mod error;
pub mod types;
