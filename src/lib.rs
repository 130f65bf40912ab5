//! Bukutamu Library Visitor Kiosk
//!
//! Check-in server for a library front desk: visitors register at a kiosk,
//! receive a personalized greeting and a QR ticket, and every check-in is
//! cached locally and mirrored to a Google Sheet. Admins list, sync and
//! export the visitor history through a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::{storage::KeyValueStore, Repository};
use services::{greeting::Greeter, Services};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire repository and services over an already opened store
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        greeter: Arc<dyn Greeter>,
    ) -> AppResult<Self> {
        let services = Services::new(Repository::new(store), &config, greeter)?;
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
