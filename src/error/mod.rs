use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::notification::{DispatchResult, ParseError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("request body is missing or is not valid JSON")]
    MissingBody,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingBody | AppError::Parse(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors are rendered in the same shape as a failed dispatch so clients
/// parse one response format.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let log_message = self.to_string();

        let client_message = if status.is_server_error() && is_production() {
            "Internal server error".to_string()
        } else {
            log_message.clone()
        };

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), message = %log_message, "API error");
        } else {
            tracing::debug!(status = %status.as_u16(), message = %log_message, "Request rejected");
        }

        (status, Json(DispatchResult::failure(client_message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
