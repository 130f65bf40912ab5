//! Configuration management for Bukutamu server

use chrono::{FixedOffset, Offset, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Google Apps Script deployment used when no operator override is stored
pub const DEFAULT_SCRIPT_URL: &str = "https://script.google.com/macros/s/AKfycbxSFcS03qMt84t0g-MrYYBD1J05EdU3Ixwd5ga3MYC6-aqBl2LY8q0sXTx-tI8CyvfM/exec";

pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1nEz96GDO6x4UW-L05UI_aYoll5Zq8Xb2i5MP_zw8gKA/edit?usp=sharing";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding one file per entry (file backend)
    pub path: PathBuf,
    pub redis_url: String,
    /// Namespace prepended to every redis key
    pub key_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    pub default_script_url: String,
    /// Human-facing spreadsheet link, shown in settings
    pub sheet_url: String,
    /// Unset means the HTTP stack default (no timeout)
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GreetingConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Kiosk local time as a fixed offset from UTC
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TicketConfig {
    pub qr_endpoint: String,
    pub qr_size: u32,
    pub qr_prefix: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub greeting: GreetingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ticket: TicketConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix BUKUTAMU_)
            .add_source(
                Environment::with_prefix("BUKUTAMU")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Gemini key from the conventional variable
            .set_override_option("greeting.api_key", env::var("GEMINI_API_KEY").ok())?
            .set_override_option("sheets.default_script_url", env::var("SCRIPT_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from("data"),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "bukutamu".to_string(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            default_script_url: DEFAULT_SCRIPT_URL.to_string(),
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "change-this-password".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        // WIB (UTC+7)
        Self {
            utc_offset_minutes: 7 * 60,
        }
    }
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            qr_endpoint: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
            qr_size: 300,
            qr_prefix: "UMMLIB".to_string(),
        }
    }
}

impl ExportConfig {
    /// Configured offset, UTC when out of range
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid export.utc_offset_minutes {}, using UTC",
                    self.utc_offset_minutes
                );
                Utc.fix()
            })
    }
}
