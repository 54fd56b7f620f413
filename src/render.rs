//! Render orchestration: stage, launch, navigate, emulate, export, tear down

use crate::async_api::{Browser, Page};
use crate::config::{Orientation, PageFormat, RenderConfiguration, RenderOverrides};
use crate::engine::Engine;
use crate::stage::{self, InputSource};
use crate::{Error, Result};
use log::{debug, warn};
use std::path::PathBuf;

/// One document to render
#[derive(Debug)]
pub struct RenderRequest {
    pub source: InputSource,
    pub overrides: RenderOverrides,
}

impl RenderRequest {
    pub fn new(source: InputSource) -> Self {
        Self { source, overrides: RenderOverrides::default() }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(InputSource::File(path.into()))
    }

    /// Static footer markup rendered on every page; scripts do not run and
    /// styles must be inline.
    pub fn footer(mut self, html: impl Into<String>) -> Self {
        self.overrides.footer_html = Some(html.into());
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.overrides.page_format = Some(format);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.overrides.orientation = Some(orientation);
        self
    }

    pub fn overrides(mut self, overrides: RenderOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// The PDF produced by the engine, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult(Vec<u8>);

impl RenderResult {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders HTML documents to PDF with an [`Engine`].
///
/// Each call to [`Renderer::render`] launches an independent browser session
/// and terminates it before returning, whether the render succeeded or not.
pub struct Renderer<E> {
    engine: E,
    defaults: RenderConfiguration,
}

impl<E: Engine + Clone> Renderer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, defaults: RenderConfiguration::default() }
    }

    /// Replace the built-in defaults that request overrides are merged onto
    pub fn with_defaults(mut self, defaults: RenderConfiguration) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &RenderConfiguration {
        &self.defaults
    }

    pub async fn render(&self, request: RenderRequest) -> Result<RenderResult> {
        let config = self.defaults.merge(&request.overrides)?;

        // Reading stdin and writing the staged file block
        let source = request.source;
        let staged = tokio::task::spawn_blocking(move || source.stage())
            .await
            .map_err(|e| Error::Other(format!("Staging task failed: {}", e)))??;
        let result = match stage::file_url(staged.path()) {
            Ok(url) => self.render_url(&url, &config).await,
            Err(e) => Err(e),
        };
        staged.cleanup();
        result
    }

    async fn render_url(&self, url: &str, config: &RenderConfiguration) -> Result<RenderResult> {
        let browser = Browser::launch(self.engine.clone()).await?;

        let outcome = async {
            let page = browser.new_page().await?;
            export(&page, url, config).await
        }
        .await;

        // A timed-out page may still be busy, so the process is killed rather
        // than closed behind it. Teardown never masks the render outcome.
        let teardown = match &outcome {
            Err(Error::NavigationTimeout(_)) => browser.abort(),
            _ => browser.close().await,
        };
        if let Err(e) = teardown {
            warn!("browser teardown failed: {}", e);
        }

        let bytes = outcome?;
        if bytes.is_empty() {
            return Err(Error::RenderError("engine returned an empty PDF".into()));
        }
        debug!("rendered {} bytes of PDF", bytes.len());
        Ok(RenderResult(bytes))
    }
}

async fn export(page: &Page, url: &str, config: &RenderConfiguration) -> Result<Vec<u8>> {
    let timeout = config.navigation_timeout;
    debug!("navigating to {}", url);
    match tokio::time::timeout(timeout, page.goto(url, timeout)).await {
        Ok(res) => res?,
        Err(_) => return Err(Error::NavigationTimeout(config.navigation_timeout_ms())),
    }

    page.emulate_media(config.media).await?;

    debug!(
        "exporting {} {:?} at scale {}",
        config.page_format, config.orientation, config.scale
    );
    page.pdf(config).await
}
