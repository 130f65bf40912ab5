//! Admin visitor endpoints: list, sync, stats, export, cache reset

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ExportPeriod,
        visitor::{SyncResponse, VisitorList, VisitorStats},
    },
};

use super::AdminUser;

/// Export query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// all (default), daily, weekly or monthly
    pub period: Option<String>,
}

/// Cache clear query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ClearCacheQuery {
    /// Must be `true`; clearing is destructive
    pub confirm: Option<bool>,
}

/// List the displayed visitors (local cache, or the last sheet sync)
#[utoipa::path(
    get,
    path = "/visitors",
    tag = "visitors",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Visitor list, newest first", body = VisitorList)
    )
)]
pub async fn list_visitors(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<VisitorList>> {
    Ok(Json(state.services.visitors.list().await))
}

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/visitors/stats",
    tag = "visitors",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Visitor statistics", body = VisitorStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<VisitorStats>> {
    Ok(Json(state.services.visitors.stats().await))
}

/// Pull every row from the Google Sheet
#[utoipa::path(
    post,
    path = "/visitors/sync",
    tag = "visitors",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Sync result", body = SyncResponse),
        (status = 502, description = "Sheet unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn sync_visitors(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<SyncResponse>> {
    tracing::info!("Sheet sync requested by {}", admin);
    let result = state.services.visitors.sync().await?;
    Ok(Json(result))
}

/// Show the local cache again instead of the synced rows
#[utoipa::path(
    post,
    path = "/visitors/view/reset",
    tag = "visitors",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Local visitor list", body = VisitorList)
    )
)]
pub async fn reset_view(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
) -> AppResult<Json<VisitorList>> {
    Ok(Json(state.services.visitors.reset_view().await))
}

/// Delete the local visitor cache (the sheet is untouched)
#[utoipa::path(
    delete,
    path = "/visitors/cache",
    tag = "visitors",
    security(("basic_auth" = [])),
    params(ClearCacheQuery),
    responses(
        (status = 204, description = "Local cache cleared"),
        (status = 400, description = "Confirmation missing")
    )
)]
pub async fn clear_cache(
    State(state): State<crate::AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<ClearCacheQuery>,
) -> AppResult<StatusCode> {
    state
        .services
        .visitors
        .clear_local(query.confirm.unwrap_or(false))
        .await?;
    tracing::info!("Local visitor cache cleared by {}", admin);
    Ok(StatusCode::NO_CONTENT)
}

/// Download the displayed visitors as CSV
#[utoipa::path(
    get,
    path = "/visitors/export",
    tag = "visitors",
    security(("basic_auth" = [])),
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 404, description = "No visitors in the period")
    )
)]
pub async fn export_visitors(
    State(state): State<crate::AppState>,
    _admin: AdminUser,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let period = match query.period.as_deref() {
        None | Some("") => ExportPeriod::All,
        Some(p) => p.parse::<ExportPeriod>().map_err(AppError::Validation)?,
    };

    let export = state.services.visitors.export(period).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    ))
}
