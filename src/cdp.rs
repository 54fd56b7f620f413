//! Chrome DevTools Protocol adapter implementation

use crate::config::{mm_to_inches, MediaType, RenderConfiguration};
use crate::engine::{Engine, KillSwitch, Page, Session};
use crate::{Error, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::protocol::cdp::{Browser as CdpBrowserDomain, Emulation, Page as CdpPageDomain};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Launch settings for the Chrome process
#[derive(Debug, Clone)]
pub struct CdpOptions {
    /// Chrome/Chromium executable; `None` lets `headless_chrome` locate one
    pub chrome_path: Option<PathBuf>,
    pub sandbox: bool,
    /// How long the browser may sit without DevTools traffic before it is
    /// considered dead. Must exceed the longest single export.
    pub idle_browser_timeout: Duration,
}

impl Default for CdpOptions {
    fn default() -> Self {
        Self {
            chrome_path: None,
            sandbox: true,
            idle_browser_timeout: Duration::from_secs(300),
        }
    }
}

/// CDP-based engine (uses the `headless_chrome` crate)
///
/// Every [`Engine::launch`] starts its own headless Chrome process.
#[derive(Debug, Clone, Default)]
pub struct CdpEngine {
    options: CdpOptions,
}

impl CdpEngine {
    pub fn new(options: CdpOptions) -> Self {
        Self { options }
    }
}

impl Engine for CdpEngine {
    type Session = CdpSession;

    fn launch(&self) -> Result<CdpSession> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.options.sandbox)
            .path(self.options.chrome_path.clone())
            .idle_browser_timeout(self.options.idle_browser_timeout)
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        debug!("launched headless chrome");
        Ok(CdpSession { browser })
    }
}

/// One headless Chrome process
pub struct CdpSession {
    browser: Browser,
}

impl Session for CdpSession {
    type Page = CdpPage;
    type KillSwitch = CdpKillSwitch;

    fn kill_switch(&self) -> CdpKillSwitch {
        CdpKillSwitch { browser: self.browser.clone() }
    }

    fn open_page(&mut self) -> Result<CdpPage> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;

        tab.call_method(CdpPageDomain::SetLifecycleEventsEnabled { enabled: true })
            .map_err(|e| Error::InitializationError(format!("Failed to enable lifecycle events: {}", e)))?;

        Ok(CdpPage { tab })
    }

    fn terminate(self) -> Result<()> {
        // Dropping the browser kills the child process
        drop(self.browser);
        Ok(())
    }
}

/// Closes Chrome over DevTools while its tab is still busy
pub struct CdpKillSwitch {
    browser: Browser,
}

impl KillSwitch for CdpKillSwitch {
    fn kill(&self) -> Result<()> {
        self.browser.call_method(CdpBrowserDomain::Close(None))?;
        Ok(())
    }
}

/// A single Chrome tab
pub struct CdpPage {
    tab: Arc<Tab>,
}

impl Page for CdpPage {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let timeout_ms = timeout.as_millis() as u64;
        let deadline = Instant::now() + timeout;

        // Lifecycle events restart with "init" for each new document, so the
        // flag only reports idleness of the navigation started below.
        let idle = Arc::new(AtomicBool::new(false));
        let flag = idle.clone();
        let listener = self
            .tab
            .add_event_listener(Arc::new(move |event: &Event| {
                if let Event::PageLifecycleEvent(ev) = event {
                    match ev.params.name.as_str() {
                        "init" => flag.store(false, Ordering::SeqCst),
                        "networkIdle" => flag.store(true, Ordering::SeqCst),
                        _ => {}
                    }
                }
            }))
            .map_err(|e| Error::LoadError(format!("Failed to watch lifecycle events: {}", e)))?;

        self.tab.set_default_timeout(timeout);
        let res = self.wait_for_idle(url, &idle, deadline, timeout_ms);

        if let Err(e) = self.tab.remove_event_listener(&listener) {
            debug!("failed to remove lifecycle listener: {}", e);
        }
        res
    }

    fn set_media_emulation(&mut self, media: MediaType) -> Result<()> {
        self.tab
            .call_method(Emulation::SetEmulatedMedia {
                media: Some(media.as_str().to_string()),
                features: None,
            })
            .map_err(|e| Error::RenderError(format!("Media emulation failed: {}", e)))?;
        Ok(())
    }

    fn export_pdf(&mut self, config: &RenderConfiguration) -> Result<Vec<u8>> {
        self.tab
            .print_to_pdf(Some(print_options(config)))
            .map_err(|e| Error::RenderError(format!("PDF export failed: {}", e)))
    }
}

impl CdpPage {
    fn wait_for_idle(&self, url: &str, idle: &AtomicBool, deadline: Instant, timeout_ms: u64) -> Result<()> {
        self.tab.navigate_to(url).map_err(|e| load_error(e, timeout_ms))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| load_error(e, timeout_ms))?;

        while !idle.load(Ordering::SeqCst) {
            if Instant::now() >= deadline {
                return Err(Error::NavigationTimeout(timeout_ms));
            }
            std::thread::sleep(IDLE_POLL_INTERVAL);
        }
        debug!("network idle reached for {}", url);
        Ok(())
    }
}

fn load_error(err: anyhow::Error, timeout_ms: u64) -> Error {
    if err.downcast_ref::<headless_chrome::util::Timeout>().is_some() {
        Error::NavigationTimeout(timeout_ms)
    } else {
        Error::LoadError(format!("Navigation failed: {}", err))
    }
}

/// Translate a render configuration into Chrome's `Page.printToPDF` options.
pub fn print_options(config: &RenderConfiguration) -> PrintToPdfOptions {
    let (width, height) = config.page_format.size_inches();

    // Chrome substitutes its own date/title header for an empty template
    let header_template = if config.header_template.is_empty() {
        "<span></span>".to_string()
    } else {
        config.header_template.clone()
    };

    PrintToPdfOptions {
        landscape: Some(config.orientation.is_landscape()),
        display_header_footer: Some(config.display_header_footer),
        print_background: Some(config.print_background),
        scale: Some(config.scale),
        paper_width: Some(width),
        paper_height: Some(height),
        margin_top: Some(mm_to_inches(config.margins.top)),
        margin_bottom: Some(mm_to_inches(config.margins.bottom)),
        margin_left: Some(mm_to_inches(config.margins.left)),
        margin_right: Some(mm_to_inches(config.margins.right)),
        header_template: Some(header_template),
        footer_template: Some(config.footer_template.clone()),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }
}
