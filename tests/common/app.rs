//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use cable_svg::models::{AppConfig, RenderConfig};
use cable_svg::server::{build_router, create_app_state_with_launcher, AppState, RENDER_ROUTE};

use super::fake_browser::{FakeLauncher, FakeStats};

/// Test application with router and direct access to the fake browser counters
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
    pub stats: Arc<FakeStats>,
}

impl TestApp {
    /// Create a test application whose browser renders the default SVG
    pub fn new() -> Self {
        Self::with_launcher(FakeLauncher::new())
    }

    /// Create a test application around a configured fake launcher, with
    /// short timeouts so failure paths finish quickly
    pub fn with_launcher(launcher: FakeLauncher) -> Self {
        Self::with_config(fast_config(), launcher)
    }

    /// Create a test application with explicit configuration
    pub fn with_config(config: AppConfig, launcher: FakeLauncher) -> Self {
        let stats = launcher.stats.clone();
        let state = create_app_state_with_launcher(&config, Arc::new(launcher));
        Self::build(state, stats)
    }

    /// Create a test application around prebuilt state (e.g. a real browser).
    /// The fake counters stay at zero.
    pub fn from_state(state: AppState) -> Self {
        Self::build(state, Arc::new(FakeStats::default()))
    }

    fn build(state: AppState, stats: Arc<FakeStats>) -> Self {
        let router = build_router(state.clone());

        Self {
            router,
            state,
            stats,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a raw body to the render endpoint
    pub async fn post_render(&self, body: &str) -> TestResponse {
        self.send(Method::POST, RENDER_ROUTE, body).await
    }

    /// POST a JSON value to the render endpoint
    pub async fn render(&self, body: serde_json::Value) -> TestResponse {
        self.post_render(&body.to_string()).await
    }

    /// Send a request with any method and a JSON body
    pub async fn send(&self, method: Method, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration with timeouts short enough for tests
pub fn fast_config() -> AppConfig {
    AppConfig {
        render: RenderConfig {
            base_url: "http://render.test".to_string(),
            navigation_timeout_ms: 300,
            svg_timeout_ms: 200,
            poll_interval_ms: 10,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get the `error` field of a JSON error body
    pub fn error_message(&self) -> String {
        let json: serde_json::Value = self.json();
        json["error"]
            .as_str()
            .expect("Expected an error field")
            .to_string()
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
    }
}
