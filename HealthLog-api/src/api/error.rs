use std::path::PathBuf;

use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, info, warn};

use health_log_domain::services::EntryServiceError;

use crate::entities::common::ErrorResponse;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] EntryServiceError),

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file {} is not valid JSON: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map the error onto the public error body
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Service(EntryServiceError::NotFound(id)) => {
                info!("Entry not found: {}", id);
                ErrorResponse::not_found("entry")
            }
            ApiError::Service(EntryServiceError::ValidationError(message)) => {
                warn!("Invalid entry data: {}", message);
                ErrorResponse::validation_error(message)
            }
            ApiError::Service(EntryServiceError::RepositoryError(message)) => {
                error!("Storage failure: {}", message);
                ErrorResponse::internal_error()
            }
            ApiError::ConfigRead { .. } | ApiError::ConfigParse { .. } => {
                error!("{}", self);
                ErrorResponse::internal_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.to_error_response().into_response()
    }
}
