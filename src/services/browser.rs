//! Headless browser driver.
//!
//! The render pipeline talks to the browser through three small traits so the
//! session and extraction logic can be exercised without a Chrome binary:
//!
//! - [`BrowserLauncher`] starts a browser process
//! - [`BrowserHandle`] is the running, shared browser
//! - [`PageContext`] is one isolated browser context with a single page
//!
//! [`ChromiumLauncher`] implements them on top of `chromiumoxide`.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::sync::Arc;

use crate::error::BrowserError;
use crate::models::BrowserConfig;

/// Returns the outer markup of the first `svg` element, or `""` if there is none.
const SVG_OUTER_HTML_JS: &str =
    "(() => { const svg = document.querySelector('svg'); return svg ? svg.outerHTML : ''; })()";

const HAS_SVG_JS: &str = "document.querySelector('svg') !== null";

const READY_STATE_JS: &str = "document.readyState";

/// Starts the shared browser process.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn BrowserHandle>, BrowserError>;
}

/// A running browser that can hand out isolated contexts.
#[async_trait]
pub trait BrowserHandle: Send + Sync {
    /// Create a fresh browser context (own cookies and storage) with one blank page.
    async fn new_context(&self) -> Result<Box<dyn PageContext>, BrowserError>;
}

/// One isolated browser context holding a single page.
#[async_trait]
pub trait PageContext: Send + Sync {
    /// Start navigating to `url`. Returns once the browser has committed the
    /// navigation; the document may still be loading.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Current `document.readyState` (`loading`, `interactive` or `complete`).
    async fn ready_state(&self) -> Result<String, BrowserError>;

    /// Whether the document currently contains an `svg` element.
    async fn has_svg(&self) -> Result<bool, BrowserError>;

    /// Serialized outer markup of the first `svg` element, if any.
    async fn svg_markup(&self) -> Result<Option<String>, BrowserError>;

    /// Close the page, then dispose of the browser context.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Launches headless Chromium through the DevTools protocol.
pub struct ChromiumLauncher {
    config: BrowserConfig,
}

impl ChromiumLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn cdp_config(&self) -> Result<CdpBrowserConfig, BrowserError> {
        let mut builder = CdpBrowserConfig::builder();
        if !self.config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(exe) = &self.config.executable {
            builder = builder.chrome_executable(exe);
        }
        for arg in &self.config.args {
            builder = builder.arg(arg.as_str());
        }
        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Arc<dyn BrowserHandle>, BrowserError> {
        let config = self.cdp_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler drives the CDP websocket; it must be polled for the
        // browser to make progress and ends when the connection closes.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "Browser handler event error");
                }
            }
            tracing::warn!("Browser connection closed");
        });

        tracing::info!(
            executable = ?self.config.executable,
            sandbox = self.config.sandbox,
            "Headless browser launched"
        );

        Ok(Arc::new(ChromiumBrowser {
            browser: Arc::new(browser),
        }))
    }
}

/// A launched Chromium process.
struct ChromiumBrowser {
    browser: Arc<Browser>,
}

#[async_trait]
impl BrowserHandle for ChromiumBrowser {
    async fn new_context(&self) -> Result<Box<dyn PageContext>, BrowserError> {
        let context_id = self
            .browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await?;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(BrowserError::Protocol)?;

        let page = match self.browser.new_page(target).await {
            Ok(page) => page,
            Err(e) => {
                // Don't leak the context if the page could not be created
                let _ = self.browser.dispose_browser_context(context_id).await;
                return Err(e.into());
            }
        };

        Ok(Box::new(ChromiumContext {
            browser: self.browser.clone(),
            context_id,
            page,
        }))
    }
}

struct ChromiumContext {
    browser: Arc<Browser>,
    context_id: BrowserContextId,
    page: Page,
}

impl ChromiumContext {
    async fn eval<T: serde::de::DeserializeOwned>(&self, js: &str) -> Result<T, BrowserError> {
        self.page
            .evaluate(js)
            .await?
            .into_value()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))
    }
}

#[async_trait]
impl PageContext for ChromiumContext {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let response = self.page.execute(NavigateParams::new(url)).await?;
        match response.result.error_text {
            Some(error) => Err(BrowserError::Protocol(error)),
            None => Ok(()),
        }
    }

    async fn ready_state(&self) -> Result<String, BrowserError> {
        self.eval(READY_STATE_JS).await
    }

    async fn has_svg(&self) -> Result<bool, BrowserError> {
        self.eval(HAS_SVG_JS).await
    }

    async fn svg_markup(&self) -> Result<Option<String>, BrowserError> {
        let markup: String = self.eval(SVG_OUTER_HTML_JS).await?;
        Ok(Some(markup).filter(|m| !m.is_empty()))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        let ChromiumContext {
            browser,
            context_id,
            page,
        } = *self;

        // Dispose the context even if closing the page failed
        let page_result = page.close().await;
        browser.dispose_browser_context(context_id).await?;
        page_result.map_err(BrowserError::from)
    }
}
