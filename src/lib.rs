//! Helpdesk ticketing backend.
//!
//! Exposes the module tree to both the server binary and the test suite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;

// Re-export commonly used types for convenience
pub use config::AppSettings;
pub use error::{AppError, AppResult};
