use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::validate::validate_request;
use crate::error::ApiError;
use crate::models::ProcessName;
use crate::services::{SvgMarkup, SvgRenderService};

/// Request body for SVG rendering (documentation only; validated by hand)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequestBody {
    /// Process step to draw. Any further fields are forwarded unchanged to
    /// the render frontend.
    pub process_name: ProcessName,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Render a cable process diagram to SVG
///
/// The whole JSON body is forwarded to the render frontend; the diagram is
/// drawn in a headless browser and its SVG markup returned as-is.
#[utoipa::path(
    post,
    path = "/api/cable-structure",
    request_body = ProcessRequestBody,
    responses(
        (status = 200, description = "Rendered diagram", body = String, content_type = "image/svg+xml"),
        (status = 400, description = "Missing or invalid processName", body = ErrorResponse),
        (status = 405, description = "Method other than POST", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse),
    ),
    tag = "Rendering"
)]
pub async fn handle_cable_structure(
    State(renderer): State<Arc<SvgRenderService>>,
    method: Method,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = validate_request(&method, &body).inspect_err(|e| {
        tracing::debug!(method = %method, error = %e, "Rejected render request");
    })?;

    tracing::info!(process = %request.process(), "Render request received");

    let svg = renderer.render(&request).await?;
    Ok(svg_response(svg))
}

/// 200 response carrying the markup byte-for-byte.
pub fn svg_response(svg: SvgMarkup) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg.into_string()).into_response()
}
