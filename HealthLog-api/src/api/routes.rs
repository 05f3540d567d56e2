use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use health_log_domain::services::EntryServiceTrait;

use crate::api::handlers::{config, entries};
use crate::openapi::configure_swagger_routes;

/// Entry service handle shared by the handlers
pub type EntryServiceHandle = Arc<dyn EntryServiceTrait + Send + Sync>;

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub entries: EntryServiceHandle,
    pub config_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(entries: EntryServiceHandle, config_file: PathBuf) -> Self {
        Self {
            entries,
            config_file: Arc::new(config_file),
        }
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Static segments must be registered alongside `/entries/:id`
    let api_routes = Router::new()
        .route("/config", get(config::get_config))
        .route("/entries", get(entries::list_entries).post(entries::create_entry))
        .route("/entries/update", put(entries::update_entry))
        .route("/entries/delete", delete(entries::delete_entry_by_query))
        .route(
            "/entries/:id",
            get(entries::get_entry)
                .put(entries::replace_entry)
                .delete(entries::delete_entry),
        );

    debug!("API routes configured");

    let app = Router::new()
        .nest("/api", api_routes)
        .with_state(state);

    let app = add_swagger_ui(app);
    debug!("Swagger UI merged");

    app.layer(cors_layer()).layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}
