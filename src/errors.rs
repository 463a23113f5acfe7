use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{extract::ParseError, gateway::GatewayError, models::ErrorBody};

/// Errors that fail a whole generation request. Per-outfit image failures
/// never reach this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is not configured")]
    Configuration(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to generate outfits")]
    UpstreamText(#[source] GatewayError),

    #[error("Failed to parse outfit suggestions")]
    Parse(#[from] ParseError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(msg) => {
                tracing::warn!("Rejected request: {msg}");
                StatusCode::BAD_REQUEST
            }
            AppError::Configuration(var) => {
                tracing::error!("Configuration error: {var} is not set");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UpstreamText(e) => {
                tracing::error!("Text generation failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Parse(e) => {
                tracing::error!("Outfit parsing failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
