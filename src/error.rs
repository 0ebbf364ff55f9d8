use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::ProcessName;

/// Body text for any failure on the browser render path.
pub const RENDER_FAILED_MESSAGE: &str = "Failed to generate SVG";

/// Body text for failures nothing else classifies.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error(
        "Invalid processName: '{0}'. Expected one of: {list}.",
        list = ProcessName::expected_list()
    )]
    InvalidProcessName(String),

    #[error("Invalid request body: malformed JSON")]
    InvalidBody,

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures on the browser render path.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(BrowserError),

    #[error("Failed to open render context: {0}")]
    Context(BrowserError),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Navigation did not reach DOM content within {0:?}")]
    NavigationTimeout(Duration),

    #[error("No SVG element appeared within {0:?}")]
    SvgTimeout(Duration),

    #[error("SVG element not found in rendered page")]
    SvgNotFound,

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}

/// Errors reported by the headless browser driver.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Launch error: {0}")]
    Launch(String),

    #[error("CDP error: {0}")]
    Protocol(String),

    #[error("Script evaluation error: {0}")]
    Evaluation(String),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Protocol(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            ApiError::MissingField(_) | ApiError::InvalidProcessName(_) | ApiError::InvalidBody => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Render(e) => {
                tracing::error!(error = %e, "Error capturing SVG");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RENDER_FAILED_MESSAGE.to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Error handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
