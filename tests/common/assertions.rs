//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is an SVG whose body is exactly `markup`
pub fn assert_svg(response: &TestResponse, markup: &str) {
    assert_ok(response);
    assert_eq!(
        response.content_type(),
        Some("image/svg+xml"),
        "Expected Content-Type: image/svg+xml"
    );
    assert_eq!(response.body, markup.as_bytes(), "SVG must pass through unmodified");
}

/// Assert a JSON error response with the given status and exact message
pub fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_status(response, status);
    assert_eq!(response.error_message(), message);
}

/// Assert the generic render failure response
pub fn assert_render_failed(response: &TestResponse) {
    assert_error(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to generate SVG",
    );
}
