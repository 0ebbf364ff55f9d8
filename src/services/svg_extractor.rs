//! Navigation, readiness polling and SVG extraction on a render page.
//!
//! The render frontend draws the diagram client-side after its page shell has
//! loaded, so extraction waits in two phases: first for the DOM to be parsed
//! (bounded by the navigation timeout), then for an `svg` element to appear
//! (bounded by the SVG timeout).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};

use crate::error::RenderError;
use crate::models::{ProcessRequest, RenderConfig};
use crate::services::browser::PageContext;

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Extracted SVG markup, passed through to the client unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgMarkup(String);

impl SvgMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SvgMarkup {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

/// Drives one render page from navigation to extracted markup.
#[derive(Debug, Clone)]
pub struct SvgExtractor {
    render_url: String,
    navigation_timeout: Duration,
    svg_timeout: Duration,
    poll_interval: Duration,
}

impl SvgExtractor {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            render_url: config.render_url(),
            navigation_timeout: config.navigation_timeout(),
            svg_timeout: config.svg_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    /// URL of the render page for this request, with the whole payload as
    /// the URL-encoded `data` query parameter.
    pub fn target_url(&self, request: &ProcessRequest) -> String {
        let payload = request.payload_json();
        let data = utf8_percent_encode(&payload, URI_COMPONENT);
        format!("{}?data={}", self.render_url, data)
    }

    /// Navigate `page` to the render target and pull out the first SVG.
    pub async fn extract(
        &self,
        page: &dyn PageContext,
        request: &ProcessRequest,
    ) -> Result<SvgMarkup, RenderError> {
        let url = self.target_url(request);
        let started = Instant::now();

        tracing::debug!(process = %request.process(), url = %url, "Navigating to render target");

        timeout(self.navigation_timeout, self.navigate(page, &url))
            .await
            .map_err(|_| RenderError::NavigationTimeout(self.navigation_timeout))??;

        timeout(self.svg_timeout, self.wait_for_svg(page))
            .await
            .map_err(|_| RenderError::SvgTimeout(self.svg_timeout))?;

        let markup = page
            .svg_markup()
            .await?
            .ok_or(RenderError::SvgNotFound)?;

        tracing::info!(
            process = %request.process(),
            bytes = markup.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "SVG extracted"
        );

        Ok(SvgMarkup(markup))
    }

    /// Navigate and wait until the DOM has been parsed.
    async fn navigate(&self, page: &dyn PageContext, url: &str) -> Result<(), RenderError> {
        page.navigate(url)
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        loop {
            match page.ready_state().await {
                Ok(state) if state != "loading" => return Ok(()),
                Ok(_) => {}
                // The document may be swapped out while the page settles
                Err(e) => tracing::debug!(error = %e, "Ready state check failed, retrying"),
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn wait_for_svg(&self, page: &dyn PageContext) {
        loop {
            match page.has_svg().await {
                Ok(true) => return,
                Ok(false) => {}
                Err(e) => tracing::debug!(error = %e, "SVG presence check failed, retrying"),
            }
            sleep(self.poll_interval).await;
        }
    }
}
