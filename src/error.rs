//! Error types for the HTML to PDF renderer

use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while staging, rendering or delivering a document
#[derive(Error, Debug)]
pub enum Error {
    /// Reading input, creating the staged file or writing output failed
    #[error("I/O failure: {0}")]
    IoError(#[from] std::io::Error),

    /// The page did not reach network idle within the navigation timeout
    #[error("Navigation timed out after {0}ms")]
    NavigationTimeout(u64),

    /// The browser could not be launched or a page could not be opened
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Navigation failed for a reason other than a timeout
    #[error("Failed to load page: {0}")]
    LoadError(String),

    /// Media emulation or PDF export failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`], used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input, temporary resource or output I/O
    Io,
    /// Network idle was not reached in time
    NavigationTimeout,
    /// The rendering engine crashed, failed to launch or returned a bad export
    Engine,
    /// Rejected before any engine work started
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IoError(_) => ErrorKind::Io,
            Error::NavigationTimeout(_) => ErrorKind::NavigationTimeout,
            Error::ConfigError(_) => ErrorKind::Config,
            Error::InitializationError(_)
            | Error::LoadError(_)
            | Error::RenderError(_)
            | Error::Other(_) => ErrorKind::Engine,
            #[cfg(feature = "cdp")]
            Error::CdpError(_) => ErrorKind::Engine,
        }
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_and_classify() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn engine_variants_share_a_kind() {
        assert_eq!(Error::InitializationError("x".into()).kind(), ErrorKind::Engine);
        assert_eq!(Error::LoadError("x".into()).kind(), ErrorKind::Engine);
        assert_eq!(Error::RenderError("x".into()).kind(), ErrorKind::Engine);
        assert_eq!(Error::NavigationTimeout(10).kind(), ErrorKind::NavigationTimeout);
        assert_eq!(Error::ConfigError("x".into()).kind(), ErrorKind::Config);
    }

    #[cfg(feature = "cdp")]
    #[test]
    fn devtools_errors_are_engine_failures() {
        let err: Error = anyhow::anyhow!("websocket closed").into();
        assert!(matches!(err, Error::CdpError(_)));
        assert_eq!(err.kind(), ErrorKind::Engine);
    }

    #[test]
    fn timeout_message_names_the_budget() {
        assert_eq!(Error::NavigationTimeout(60000).to_string(), "Navigation timed out after 60000ms");
    }
}
