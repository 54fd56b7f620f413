//! Browser engine contract
//!
//! The renderer only needs a handful of capabilities from a headless browser.
//! Backends implement these synchronous traits; [`crate::async_api`] runs them
//! on a dedicated worker thread so callers get an async interface.

use crate::config::{MediaType, RenderConfiguration};
use crate::Result;
use std::time::Duration;

/// A backend able to start browser sessions
pub trait Engine: Send + 'static {
    type Session: Session;

    /// Launch a fresh browser process
    fn launch(&self) -> Result<Self::Session>;
}

/// One running browser process
pub trait Session {
    type Page: Page;
    type KillSwitch: KillSwitch;

    /// A handle that can end this browser process from another thread while
    /// the session itself is busy with a page call
    fn kill_switch(&self) -> Self::KillSwitch;

    /// Open a new page (tab) in this browser
    fn open_page(&mut self) -> Result<Self::Page>;

    /// Shut the browser process down
    fn terminate(self) -> Result<()>;
}

/// Out-of-band termination for a [`Session`]
pub trait KillSwitch: Send + Sync + 'static {
    /// End the browser process now. Page calls still running on the session
    /// fail or return once the process is gone.
    fn kill(&self) -> Result<()>;
}

/// A single page inside a [`Session`]
pub trait Page {
    /// Navigate to `url` and block until the network has gone idle.
    ///
    /// Fails with [`crate::Error::NavigationTimeout`] when idle is not reached
    /// within `timeout`.
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Select which CSS media rules the page is rendered with
    fn set_media_emulation(&mut self, media: MediaType) -> Result<()>;

    /// Export the loaded page as PDF bytes
    fn export_pdf(&mut self, config: &RenderConfiguration) -> Result<Vec<u8>>;
}
