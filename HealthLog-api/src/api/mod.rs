pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use health_log_domain::services::{create_default_entry_service, EntryServiceError};

use crate::config::AppConfig;
use routes::AppState;

/// Create the application router on the process-wide database pool
pub fn create_application(config: &AppConfig) -> Result<Router, EntryServiceError> {
    let service = create_default_entry_service()?;
    let state = AppState::new(Arc::new(service), config.config_file.clone());
    Ok(routes::create_app(state))
}
