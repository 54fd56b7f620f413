//! Output delivery

use crate::Result;
use log::debug;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination for the rendered PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Standard output; written and flushed but never closed
    Stdout,
    /// A file that is created or replaced
    File(PathBuf),
}

impl OutputSink {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(OutputSink::Stdout, OutputSink::File)
    }
}

/// Write every byte of `buffer` to `sink`, returning once the sink has flushed.
///
/// File sinks are written next to the destination and renamed into place, so a
/// failed write leaves no partial PDF behind.
pub fn deliver(buffer: &[u8], sink: &OutputSink) -> Result<()> {
    match sink {
        OutputSink::Stdout => {
            let stdout = io::stdout();
            write_flushed(&mut stdout.lock(), buffer)?;
        }
        OutputSink::File(path) => write_file(path, buffer)?,
    }
    debug!("delivered {} bytes to {:?}", buffer.len(), sink);
    Ok(())
}

/// Write all of `buffer` and flush `writer`.
pub fn write_flushed<W: Write>(writer: &mut W, buffer: &[u8]) -> io::Result<()> {
    writer.write_all(buffer)?;
    writer.flush()
}

fn write_file(path: &Path, buffer: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    write_flushed(&mut file, buffer)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
