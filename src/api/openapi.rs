//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{checkin, health, settings, visitors};

struct BasicAuthAddon;

impl Modify for BasicAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bukutamu API",
        version = "0.3.0",
        description = "Library visitor check-in kiosk REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Kiosk
        checkin::check_in,
        checkin::get_ticket,
        // Visitors
        visitors::list_visitors,
        visitors::get_stats,
        visitors::sync_visitors,
        visitors::reset_view,
        visitors::clear_cache,
        visitors::export_visitors,
        // Settings
        settings::get_script_url,
        settings::update_script_url,
    ),
    components(
        schemas(
            // Visitors
            crate::models::visitor::VisitorRecord,
            crate::models::visitor::CheckInRequest,
            crate::models::visitor::CheckInResponse,
            crate::models::visitor::VisitorList,
            crate::models::visitor::ViewSource,
            crate::models::visitor::SyncResponse,
            crate::models::visitor::SyncOutcome,
            crate::models::visitor::VisitorStats,
            crate::models::visitor::EndpointKind,
            crate::models::ticket::Ticket,
            crate::models::enums::ExportPeriod,
            // Settings
            settings::ScriptUrlSettings,
            settings::UpdateScriptUrlRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BasicAuthAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "kiosk", description = "Visitor check-in and tickets"),
        (name = "visitors", description = "Visitor history, sync and export"),
        (name = "settings", description = "Remote sheet settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
