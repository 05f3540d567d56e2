use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Configuration endpoint
        crate::api::handlers::config::get_config,

        // Entry endpoints
        crate::api::handlers::entries::list_entries,
        crate::api::handlers::entries::get_entry,
        crate::api::handlers::entries::create_entry,
        crate::api::handlers::entries::replace_entry,
        crate::api::handlers::entries::update_entry,
        crate::api::handlers::entries::delete_entry,
        crate::api::handlers::entries::delete_entry_by_query
    ),
    components(
        schemas(
            crate::entities::entry::Entry,
            crate::entities::entry::EntryRequest,
            crate::entities::entry::EntryUpdateRequest,
            crate::entities::common::ErrorResponse,
            crate::entities::common::SuccessResponse
        )
    ),
    tags(
        (name = "entries", description = "Health log entry management endpoints"),
        (name = "config", description = "Client configuration endpoint")
    ),
    info(
        title = "HealthLog API",
        version = "0.1.0",
        description = "API for recording blood sugar, blood pressure, weight, insulin and exercise",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
