use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Application configuration loaded from an optional YAML file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where and how diagrams are rendered
    pub render: RenderConfig,

    /// Headless browser launch options
    pub browser: BrowserConfig,
}

/// Render target location and timing.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    /// Base URL of the render frontend (varies per deployment)
    pub base_url: String,

    /// Path of the render page on the frontend
    pub path: String,

    /// Upper bound for navigation until the DOM is parsed
    pub navigation_timeout_ms: u64,

    /// Upper bound for the SVG element to appear after navigation
    pub svg_timeout_ms: u64,

    /// Delay between checks while waiting for page state
    pub poll_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            path: "/svg-render".to_string(),
            navigation_timeout_ms: 10_000,
            svg_timeout_ms: 5_000,
            poll_interval_ms: 100,
        }
    }
}

impl RenderConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn svg_timeout(&self) -> Duration {
        Duration::from_millis(self.svg_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Full URL of the render page, without query string.
    pub fn render_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}

/// Options for launching the shared headless browser.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BrowserConfig {
    /// Chrome/Chromium binary; autodetected when unset
    pub executable: Option<PathBuf>,

    /// Keep Chromium's sandbox enabled (disabled by default for containers)
    pub sandbox: bool,

    /// Extra command line flags passed to the browser
    pub args: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// path is unset or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;

        tracing::info!(
            path = %path.display(),
            render_url = %config.render.render_url(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply `RENDER_BASE_URL` and `CHROME_EXECUTABLE` environment overrides.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = std::env::var("RENDER_BASE_URL") {
            self.render.base_url = url;
        }
        if let Ok(exe) = std::env::var("CHROME_EXECUTABLE") {
            self.browser.executable = Some(PathBuf::from(exe));
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.render.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "render.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.render.navigation_timeout_ms == 0 || self.render.svg_timeout_ms == 0 {
            return Err(ConfigError::Invalid("render timeouts must be non-zero".into()));
        }
        Ok(())
    }
}
