//! API handlers for Bukutamu REST endpoints

pub mod checkin;
pub mod health;
pub mod openapi;
pub mod settings;
pub mod visitors;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{delete, get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Extractor for the library admin (HTTP Basic, static credentials)
pub struct AdminUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(credentials)) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        let admin = &state.config.admin;
        if credentials.username() != admin.username || credentials.password() != admin.password {
            tracing::warn!("Rejected admin login for {:?}", credentials.username());
            return Err(AppError::Authentication("Invalid admin credentials".to_string()));
        }

        Ok(AdminUser(credentials.username().to_string()))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Kiosk
        .route("/checkins", post(checkin::check_in))
        .route("/tickets/:id", get(checkin::get_ticket))
        // Admin
        .route("/visitors", get(visitors::list_visitors))
        .route("/visitors/stats", get(visitors::get_stats))
        .route("/visitors/sync", post(visitors::sync_visitors))
        .route("/visitors/view/reset", post(visitors::reset_view))
        .route("/visitors/cache", delete(visitors::clear_cache))
        .route("/visitors/export", get(visitors::export_visitors))
        // Settings
        .route(
            "/settings/script-url",
            get(settings::get_script_url).put(settings::update_script_url),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
