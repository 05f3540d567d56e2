use axum::extract::{Json, State};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::AppState;
use crate::entities::common::ErrorResponse;

/// Serve the client configuration document verbatim
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Contents of the configuration file", body = Object),
        (status = 500, description = "Configuration file missing or unreadable", body = ErrorResponse),
    ),
    tag = "config"
)]
#[instrument(skip(state))]
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let path = state.config_file.as_path();
    debug!("Reading configuration from {}", path.display());

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ApiError::ConfigRead { path: path.to_path_buf(), source })?;

    let config = serde_json::from_str(&contents)
        .map_err(|source| ApiError::ConfigParse { path: path.to_path_buf(), source })?;

    Ok(Json(config))
}
