//! htmltopdf
//!
//! Render an HTML document to PDF by loading it in a headless browser and
//! exporting a paginated snapshot of the page.
//!
//! # Features
//!
//! - **CDP Backend** (default): Uses Chrome DevTools Protocol via headless Chrome
//! - **Swappable engines**: anything implementing [`engine::Engine`] can render
//! - **Scoped resources**: the browser process and staged input are released on
//!   every exit path
//!
//! # Example
//!
//! ```no_run
//! use htmltopdf::{OutputSink, PageFormat, RenderRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = RenderRequest::from_path("report.html")
//!     .page_format(PageFormat::A4)
//!     .footer("<div style=\"font-size:8px\">Confidential</div>");
//!
//! let pdf = htmltopdf::render(request).await?;
//! htmltopdf::deliver(pdf.as_bytes(), &OutputSink::File("report.pdf".into()))?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod config;
pub mod engine;
pub mod output;
pub mod render;
pub mod stage;

// Async facade that drives any engine from a worker thread
pub mod async_api;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use config::{Margins, MediaType, Orientation, PageFormat, RenderConfiguration, RenderOverrides};
pub use output::{deliver, OutputSink};
pub use render::{RenderRequest, RenderResult, Renderer};
pub use stage::{stage_input, InputSource, StagedInput};

/// Render `request` with a default headless Chrome engine
#[cfg(feature = "cdp")]
pub async fn render(request: RenderRequest) -> Result<RenderResult> {
    Renderer::new(cdp::CdpEngine::default()).render(request).await
}
