//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{BrowserLauncher, BrowserSession, ChromiumLauncher, SvgRenderService};

/// Path of the SVG rendering endpoint.
pub const RENDER_ROUTE: &str = "/api/cable-structure";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<BrowserSession>,
    pub renderer: Arc<SvgRenderService>,
}

/// Create application state that launches Chromium on first use.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let launcher = Arc::new(ChromiumLauncher::new(config.browser.clone()));
    create_app_state_with_launcher(config, launcher)
}

/// Create application state with a custom browser launcher.
pub fn create_app_state_with_launcher(
    config: &AppConfig,
    launcher: Arc<dyn BrowserLauncher>,
) -> AppState {
    let session = Arc::new(BrowserSession::new(launcher));
    let renderer = Arc::new(SvgRenderService::new(session.clone(), &config.render));

    AppState { session, renderer }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Every method reaches the handler so a wrong verb gets the JSON 405
        .route(RENDER_ROUTE, any(api::handle_cable_structure))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state.renderer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Turn a handler panic into the generic 500 response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
