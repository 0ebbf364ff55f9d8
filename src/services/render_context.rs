//! Per-request browser context with guaranteed teardown.

use std::time::Instant;

use crate::error::BrowserError;
use crate::services::browser::{BrowserHandle, PageContext};

/// An isolated browser context and page owned by a single request.
///
/// Call [`close`](Self::close) when done. If the value is dropped without
/// being closed (the request future was cancelled, or a panic unwound through
/// it) the close is spawned on the tokio runtime instead, so every opened
/// context is closed exactly once.
pub struct RenderContext {
    page: Option<Box<dyn PageContext>>,
    opened_at: Instant,
}

impl RenderContext {
    /// Open a fresh context and page on the shared browser.
    pub async fn open(browser: &dyn BrowserHandle) -> Result<Self, BrowserError> {
        let page = browser.new_context().await?;
        tracing::debug!("Render context opened");
        Ok(Self {
            page: Some(page),
            opened_at: Instant::now(),
        })
    }

    /// The page inside this context.
    pub fn page(&self) -> &dyn PageContext {
        // Only `close` and `drop` take the page, and both consume the context
        self.page
            .as_deref()
            .expect("render context page taken before close")
    }

    /// Close the page and the context. Failures are logged, not returned:
    /// the request outcome is already decided at this point.
    ///
    /// The close runs as its own task, so it completes even if the caller is
    /// cancelled while awaiting it.
    pub async fn close(mut self) {
        if let Some(page) = self.page.take() {
            let task = tokio::spawn(close_page(page, self.opened_at));
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Render context close task failed");
            }
        }
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let opened_at = self.opened_at;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!("Render context dropped before close, closing in background");
                handle.spawn(close_page(page, opened_at));
            }
            Err(_) => {
                tracing::warn!("Render context dropped outside of a runtime, context leaked");
            }
        }
    }
}

async fn close_page(page: Box<dyn PageContext>, opened_at: Instant) {
    match page.close().await {
        Ok(()) => tracing::debug!(
            elapsed_ms = opened_at.elapsed().as_millis() as u64,
            "Render context closed"
        ),
        Err(e) => tracing::warn!(error = %e, "Failed to close render context"),
    }
}
