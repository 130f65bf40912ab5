//! Settings service (remote sheet endpoint)

use reqwest::Url;

use crate::{
    api::settings::{ScriptUrlSettings, UpdateScriptUrlRequest},
    config::SheetsConfig,
    error::{AppError, AppResult},
    models::visitor::EndpointKind,
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    sheets: SheetsConfig,
}

impl SettingsService {
    pub fn new(repository: Repository, sheets: SheetsConfig) -> Self {
        Self { repository, sheets }
    }

    /// Endpoint to use right now: operator override, else the built-in default
    pub async fn script_url(&self) -> String {
        self.repository
            .settings
            .script_url()
            .await
            .unwrap_or_else(|| self.sheets.default_script_url.clone())
    }

    fn kind_of(&self, url: &str) -> EndpointKind {
        if url == self.sheets.default_script_url {
            EndpointKind::Default
        } else {
            EndpointKind::Custom
        }
    }

    pub async fn endpoint_kind(&self) -> EndpointKind {
        self.kind_of(&self.script_url().await)
    }

    pub async fn get_settings(&self) -> ScriptUrlSettings {
        let script_url = self.script_url().await;
        ScriptUrlSettings {
            endpoint: self.kind_of(&script_url),
            script_url,
            default_script_url: self.sheets.default_script_url.clone(),
            sheet_url: self.sheets.sheet_url.clone(),
        }
    }

    /// Store a new override; a blank URL reverts to the default
    pub async fn update_settings(&self, request: UpdateScriptUrlRequest) -> AppResult<ScriptUrlSettings> {
        let url = request.script_url.trim();

        if url.is_empty() {
            self.repository.settings.clear_script_url().await?;
            tracing::info!("Script URL override removed, using default endpoint");
        } else {
            let parsed = Url::parse(url)
                .map_err(|e| AppError::Validation(format!("Invalid script URL: {}", e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::Validation(
                    "Script URL must use http or https".to_string(),
                ));
            }
            self.repository.settings.set_script_url(url).await?;
            tracing::info!("Script URL override saved");
        }

        Ok(self.get_settings().await)
    }
}
