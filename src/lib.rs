//! EquipTrack Equipment Rental Management System
//!
//! A Rust implementation of the EquipTrack rental server, providing a REST
//! JSON API for browsing equipment, booking rentals and managing inventory.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
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
