pub mod config;
pub mod process;

pub use config::{AppConfig, BrowserConfig, ConfigError, RenderConfig};
pub use process::{ProcessName, ProcessRequest, UnknownProcess};
