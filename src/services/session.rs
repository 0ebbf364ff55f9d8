use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::BrowserError;
use crate::services::browser::{BrowserHandle, BrowserLauncher};

/// Owns the single headless browser shared by all requests.
///
/// The browser is launched lazily on the first [`acquire`](Self::acquire) and
/// kept for the lifetime of the session. Concurrent first callers wait on the
/// same in-flight launch, so at most one browser process is started.
pub struct BrowserSession {
    launcher: Arc<dyn BrowserLauncher>,
    browser: OnceCell<Arc<dyn BrowserHandle>>,
}

impl BrowserSession {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            browser: OnceCell::new(),
        }
    }

    /// Get the shared browser, launching it if this is the first use.
    ///
    /// A failed launch is returned to the caller and leaves the session empty;
    /// the next call attempts a new launch.
    pub async fn acquire(&self) -> Result<Arc<dyn BrowserHandle>, BrowserError> {
        let browser = self
            .browser
            .get_or_try_init(|| async {
                tracing::info!("Launching shared headless browser");
                self.launcher.launch().await.inspect_err(|e| {
                    tracing::error!(error = %e, "Failed to launch headless browser");
                })
            })
            .await?;
        Ok(browser.clone())
    }

    /// Whether the shared browser has been launched.
    pub fn is_launched(&self) -> bool {
        self.browser.initialized()
    }
}
