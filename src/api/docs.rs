//! OpenAPI document and its HTTP exposure.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    LoginRequest, LoginResponse, MeResponse, MessageResponse, NoteRequest, RegisterRequest,
    RegisterResponse,
};
use crate::api::handlers::{auth, notes, system};
use crate::app_state::AppState;
use crate::domain::{Note, NoteId, UserId, UserProfile};
use crate::error::{ErrorBody, ErrorResponse};

/// Path of the generated OpenAPI JSON document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Aggregated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "notes-api",
        description = "Multi-tenant notes service with token or session authentication."
    ),
    paths(
        system::root_handler,
        system::health_handler,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        notes::create_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
    ),
    components(schemas(
        Note,
        NoteId,
        UserId,
        UserProfile,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        MeResponse,
        NoteRequest,
        MessageResponse,
        ErrorResponse,
        ErrorBody,
        system::ServiceInfo,
        system::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Service info and health"),
        (name = "Auth", description = "Registration and login"),
        (name = "Notes", description = "Per-user note CRUD"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by protected paths.
#[derive(Debug)]
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Swagger UI at `/swagger-ui`, backed by the document at [`OPENAPI_PATH`].
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new().merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()),
    )
}

/// The raw OpenAPI document at [`OPENAPI_PATH`].
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
