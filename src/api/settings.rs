//! Settings endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::visitor::EndpointKind};

use super::AdminUser;

/// Remote sheet endpoint settings
#[derive(Debug, Serialize, ToSchema)]
pub struct ScriptUrlSettings {
    /// Endpoint currently used for sync and check-in mirroring
    pub script_url: String,
    /// Built-in endpoint
    pub default_script_url: String,
    /// Link to the spreadsheet itself
    pub sheet_url: String,
    pub endpoint: EndpointKind,
}

/// Update the script URL; an empty value reverts to the default
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScriptUrlRequest {
    pub script_url: String,
}

/// Get the remote sheet endpoint
#[utoipa::path(
    get,
    path = "/settings/script-url",
    tag = "settings",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Current endpoint", body = ScriptUrlSettings)
    )
)]
pub async fn get_script_url(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ScriptUrlSettings>> {
    Ok(Json(state.services.settings.get_settings().await))
}

/// Set or clear the remote sheet endpoint override
#[utoipa::path(
    put,
    path = "/settings/script-url",
    tag = "settings",
    security(("basic_auth" = [])),
    request_body = UpdateScriptUrlRequest,
    responses(
        (status = 200, description = "Endpoint updated", body = ScriptUrlSettings),
        (status = 400, description = "Invalid URL")
    )
)]
pub async fn update_script_url(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Json(request): Json<UpdateScriptUrlRequest>,
) -> AppResult<Json<ScriptUrlSettings>> {
    let settings = state.services.settings.update_settings(request).await?;
    Ok(Json(settings))
}
