use std::sync::Arc;

use crate::error::RenderError;
use crate::models::{ProcessRequest, RenderConfig};
use crate::services::render_context::RenderContext;
use crate::services::session::BrowserSession;
use crate::services::svg_extractor::{SvgExtractor, SvgMarkup};

/// Renders validated process requests to SVG on the shared browser.
pub struct SvgRenderService {
    session: Arc<BrowserSession>,
    extractor: SvgExtractor,
}

impl SvgRenderService {
    pub fn new(session: Arc<BrowserSession>, config: &RenderConfig) -> Self {
        Self {
            session,
            extractor: SvgExtractor::new(config),
        }
    }

    /// Acquire the browser, render in a fresh context, and tear the context
    /// down again whatever the outcome.
    pub async fn render(&self, request: &ProcessRequest) -> Result<SvgMarkup, RenderError> {
        let browser = self
            .session
            .acquire()
            .await
            .map_err(RenderError::LaunchFailed)?;

        let context = RenderContext::open(browser.as_ref())
            .await
            .map_err(RenderError::Context)?;

        let result = self.extractor.extract(context.page(), request).await;
        context.close().await;
        result
    }
}
