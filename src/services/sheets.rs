//! Google Apps Script client for the visitor spreadsheet
//!
//! The sheet is an append-only log: `GET` returns every row, `POST` appends
//! one. Appends are fire-and-forget: the response status is not checked and
//! a failed dispatch is logged without retry. Delivery is at most once.

use serde_json::Value;
use std::time::Duration;

use crate::{
    config::SheetsConfig,
    error::{AppError, AppResult},
    models::visitor::VisitorRecord,
};

#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Read the whole sheet, oldest row first
    pub async fn fetch_all(&self, endpoint: &str) -> AppResult<Vec<VisitorRecord>> {
        tracing::info!("Fetching visitors from sheet");
        tracing::debug!("Sheet endpoint: {}", endpoint);

        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Sheet request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transport(format!(
                "Sheet endpoint answered HTTP {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("Sheet response is not JSON: {}", e)))?;

        let rows = match body {
            Value::Array(rows) => rows,
            other => {
                return Err(AppError::Transport(format!(
                    "Sheet response is not a list of rows (got {})",
                    json_kind(&other)
                )))
            }
        };

        let total = rows.len();
        let records: Vec<VisitorRecord> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(idx, row)| match row {
                Value::Object(map) => Some(VisitorRecord::from_remote_row(&map)),
                other => {
                    tracing::warn!("Discarding sheet row {}: {} is not an object", idx + 1, json_kind(&other));
                    None
                }
            })
            .collect();

        tracing::info!("Sheet returned {} visitors ({} rows)", records.len(), total);
        Ok(records)
    }

    /// Dispatch one record to the sheet. Never fails.
    pub async fn append(&self, endpoint: &str, record: &VisitorRecord) {
        match self.http.post(endpoint).json(record).send().await {
            Ok(response) => {
                tracing::info!("Sent visitor {} to sheet", record.id);
                tracing::debug!("Sheet append answered HTTP {} (not checked)", response.status());
            }
            Err(e) => {
                tracing::error!("Failed to send visitor {} to sheet: {}", record.id, e);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
