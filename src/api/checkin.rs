//! Kiosk endpoints (no authentication)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        ticket::Ticket,
        visitor::{CheckInRequest, CheckInResponse},
    },
};

/// Register a visitor
#[utoipa::path(
    post,
    path = "/checkins",
    tag = "kiosk",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Visitor checked in", body = CheckInResponse),
        (status = 400, description = "Missing name")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    Json(request): Json<CheckInRequest>,
) -> AppResult<(StatusCode, Json<CheckInResponse>)> {
    let response = state.services.visitors.check_in(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Ticket of a locally cached visitor
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    tag = "kiosk",
    params(("id" = String, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Ticket", body = Ticket),
        (status = 404, description = "Unknown visitor")
    )
)]
pub async fn get_ticket(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.services.visitors.ticket(&id).await?;
    Ok(Json(ticket))
}
