//! Elibris Library Lending Service
//!
//! A Rust REST API server for a small lending library: user signup and
//! token authentication, an admin-managed book catalog with copy counts,
//! and a loan ledger tracking borrows and returns against the shared
//! availability pool.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
