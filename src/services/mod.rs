pub mod browser;
pub mod render_context;
pub mod session;
pub mod svg_extractor;
pub mod svg_service;

pub use browser::{BrowserHandle, BrowserLauncher, ChromiumLauncher, PageContext};
pub use render_context::RenderContext;
pub use session::BrowserSession;
pub use svg_extractor::{SvgExtractor, SvgMarkup};
pub use svg_service::SvgRenderService;
