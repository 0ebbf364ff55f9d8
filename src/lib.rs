//! cable-svg
//!
//! Renders cable manufacturing process diagrams in a shared headless browser
//! and serves the resulting SVG markup over HTTP.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
