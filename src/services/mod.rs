//! Business logic services

pub mod export;
pub mod greeting;
pub mod settings;
pub mod sheets;
pub mod ticket;
pub mod visitors;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub settings: settings::SettingsService,
    pub visitors: visitors::VisitorsService,
}

impl Services {
    /// Create all services with the given repository and greeting backend
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        greeter: Arc<dyn greeting::Greeter>,
    ) -> AppResult<Self> {
        let settings = settings::SettingsService::new(repository.clone(), config.sheets.clone());
        let sheets = sheets::SheetsClient::new(&config.sheets)?;

        Ok(Self {
            visitors: visitors::VisitorsService::new(
                repository.clone(),
                sheets,
                settings.clone(),
                greeter,
                config.ticket.clone(),
                config.export.offset(),
            ),
            repository,
            settings,
        })
    }
}
