//! Render configuration: built-in defaults merged with per-request overrides

use crate::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Named paper-size preset consumed by the export step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PageFormat {
    #[default]
    #[value(name = "Letter")]
    Letter,
    #[value(name = "Legal")]
    Legal,
    #[value(name = "Tabloid")]
    Tabloid,
    #[value(name = "Ledger")]
    Ledger,
    #[value(name = "A0")]
    A0,
    #[value(name = "A1")]
    A1,
    #[value(name = "A2")]
    A2,
    #[value(name = "A3")]
    A3,
    #[value(name = "A4")]
    A4,
    #[value(name = "A5")]
    A5,
    #[value(name = "A6")]
    A6,
}

impl PageFormat {
    pub fn name(self) -> &'static str {
        match self {
            PageFormat::Letter => "Letter",
            PageFormat::Legal => "Legal",
            PageFormat::Tabloid => "Tabloid",
            PageFormat::Ledger => "Ledger",
            PageFormat::A0 => "A0",
            PageFormat::A1 => "A1",
            PageFormat::A2 => "A2",
            PageFormat::A3 => "A3",
            PageFormat::A4 => "A4",
            PageFormat::A5 => "A5",
            PageFormat::A6 => "A6",
        }
    }

    /// Paper `(width, height)` in inches, portrait as Chrome lays it out.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            PageFormat::Letter => (8.5, 11.0),
            PageFormat::Legal => (8.5, 14.0),
            PageFormat::Tabloid => (11.0, 17.0),
            PageFormat::Ledger => (17.0, 11.0),
            PageFormat::A0 => (33.1, 46.8),
            PageFormat::A1 => (23.4, 33.1),
            PageFormat::A2 => (16.54, 23.4),
            PageFormat::A3 => (11.7, 16.54),
            PageFormat::A4 => (8.27, 11.7),
            PageFormat::A5 => (5.83, 8.27),
            PageFormat::A6 => (4.13, 5.83),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_landscape(landscape: bool) -> Self {
        if landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn is_landscape(self) -> bool {
        self == Orientation::Landscape
    }
}

/// CSS media type the page is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Screen,
    Print,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Screen => "screen",
            MediaType::Print => "print",
        }
    }
}

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self { top: 11.0, right: 9.0, bottom: 11.0, left: 9.0 }
    }
}

pub(crate) fn mm_to_inches(mm: f64) -> f64 {
    mm / 25.4
}

/// Immutable snapshot of every knob the export step consumes
///
/// The defaults reproduce the classic output of this tool:
/// - 11mm top/bottom and 9mm left/right margins
/// - backgrounds printed, content scaled to 0.8
/// - a 60 second navigation budget
/// - no header or footer, "screen" media, Letter portrait
///
/// # Examples
///
/// ```
/// let cfg = htmltopdf::RenderConfiguration::default();
/// assert_eq!(cfg.scale, 0.8);
/// assert!(!cfg.display_header_footer);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfiguration {
    pub margins: Margins,
    /// Whether background colours and images are printed
    pub print_background: bool,
    pub scale: f64,
    /// Upper bound for reaching network idle after navigation starts
    pub navigation_timeout: Duration,
    /// Derived from the footer; see [`RenderConfiguration::set_footer`]
    pub display_header_footer: bool,
    pub header_template: String,
    pub footer_template: String,
    pub media: MediaType,
    pub page_format: PageFormat,
    pub orientation: Orientation,
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            print_background: true,
            scale: 0.8,
            navigation_timeout: Duration::from_millis(60000),
            display_header_footer: false,
            header_template: String::new(),
            footer_template: String::new(),
            media: MediaType::Screen,
            page_format: PageFormat::Letter,
            orientation: Orientation::Portrait,
        }
    }
}

impl RenderConfiguration {
    /// Install footer markup. Non-empty markup turns header/footer display on;
    /// `None` or an empty string turns it off.
    pub fn set_footer(&mut self, html: Option<&str>) {
        let html = html.unwrap_or_default();
        self.display_header_footer = !html.is_empty();
        self.footer_template = html.to_string();
    }

    /// Apply `overrides` field by field and validate the result.
    ///
    /// A margins override replaces all four sides at once.
    pub fn merge(&self, overrides: &RenderOverrides) -> Result<Self> {
        let mut merged = self.clone();

        if let Some(margins) = overrides.margins {
            merged.margins = margins;
        }
        if let Some(print_background) = overrides.print_background {
            merged.print_background = print_background;
        }
        if let Some(scale) = overrides.scale {
            merged.scale = scale;
        }
        if let Some(timeout) = overrides.navigation_timeout {
            merged.navigation_timeout = timeout;
        }
        if let Some(format) = overrides.page_format {
            merged.page_format = format;
        }
        if let Some(orientation) = overrides.orientation {
            merged.orientation = orientation;
        }
        if let Some(footer) = &overrides.footer_html {
            merged.set_footer(Some(footer.as_str()));
        }

        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.1..=2.0).contains(&self.scale) {
            return Err(Error::ConfigError(format!("scale {} is outside 0.1..=2.0", self.scale)));
        }
        if self.navigation_timeout.is_zero() {
            return Err(Error::ConfigError("navigation timeout must be greater than zero".into()));
        }
        let Margins { top, right, bottom, left } = self.margins;
        if [top, right, bottom, left].iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(Error::ConfigError(format!("invalid margins {:?}", self.margins)));
        }
        Ok(())
    }

    pub fn navigation_timeout_ms(&self) -> u64 {
        self.navigation_timeout.as_millis() as u64
    }
}

/// Caller-supplied values; `None` keeps the default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOverrides {
    pub margins: Option<Margins>,
    pub print_background: Option<bool>,
    pub scale: Option<f64>,
    pub navigation_timeout: Option<Duration>,
    pub footer_html: Option<String>,
    pub page_format: Option<PageFormat>,
    pub orientation: Option<Orientation>,
}
