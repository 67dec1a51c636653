//! Biblioteca book catalog server
//!
//! REST JSON API over a PostgreSQL book catalog, with JWT authentication and
//! a MongoDB mirror used for per-year price aggregation.

use std::sync::Arc;

pub mod aggregation;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
