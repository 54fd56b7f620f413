//! Input staging: turn a path or a byte stream into a local file the browser can open

use crate::{Error, Result};
use log::{debug, warn};
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use url::Url;

const TEMP_PREFIX: &str = "htmltopdf-";
const TEMP_SUFFIX: &str = ".html";

/// Where the HTML document comes from
pub enum InputSource {
    /// An existing file; its existence is not checked here
    File(PathBuf),
    /// The process's standard input
    Stdin,
    /// Any other byte stream
    Reader(Box<dyn Read + Send>),
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => f.debug_tuple("File").field(path).finish(),
            InputSource::Stdin => f.write_str("Stdin"),
            InputSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl InputSource {
    pub fn stage(self) -> Result<StagedInput> {
        match self {
            InputSource::File(path) => stage_input(Some(&path), io::empty),
            InputSource::Stdin => stage_input(None, io::stdin),
            InputSource::Reader(reader) => stage_input(None, move || reader),
        }
    }
}

/// A browser-addressable local file, removed on drop when it was created here
#[derive(Debug)]
pub enum StagedInput {
    Provided(PathBuf),
    Temporary(NamedTempFile),
}

impl StagedInput {
    pub fn path(&self) -> &Path {
        match self {
            StagedInput::Provided(path) => path,
            StagedInput::Temporary(file) => file.path(),
        }
    }

    /// Remove the temporary file, if any. Failures are logged, not returned.
    pub fn cleanup(self) {
        if let StagedInput::Temporary(file) = self {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(()) => debug!("removed staged input {}", path.display()),
                Err(e) => warn!("failed to remove staged input {}: {}", path.display(), e),
            }
        }
    }
}

/// Produce a local file for the renderer to load.
///
/// An explicit path is returned unchanged. Otherwise `provider` is called and
/// its stream is read to completion into a fresh `htmltopdf-*.html` temporary
/// file.
pub fn stage_input<F, R>(explicit: Option<&Path>, provider: F) -> Result<StagedInput>
where
    F: FnOnce() -> R,
    R: Read,
{
    if let Some(path) = explicit {
        return Ok(StagedInput::Provided(path.to_path_buf()));
    }

    let mut html = Vec::new();
    provider().read_to_end(&mut html)?;

    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile()?;
    file.write_all(&html)?;
    file.flush()?;

    debug!("staged {} bytes of input at {}", html.len(), file.path().display());
    Ok(StagedInput::Temporary(file))
}

/// Build the `file://` URL for a staged path, resolving relative paths
/// against the current directory.
pub fn file_url(path: &Path) -> Result<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| {
            Error::IoError(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot express {} as a file URL", absolute.display()),
            ))
        })
}
