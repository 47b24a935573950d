//! Output modes and destinations.
//!
//! [`OutputMode`] selects how structured results are printed. A
//! [`Destination`] is a shared, cloneable writer; clones write to the same
//! place and share one identity, which is what the table printer cache is
//! keyed on.

use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// How structured results are printed.
///
/// This is the value behind the `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputMode {
    /// Parses a flag value, case-insensitively. Unknown values select
    /// [`OutputMode::Table`].
    pub fn from_flag(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => OutputMode::Json,
            "yaml" => OutputMode::Yaml,
            _ => OutputMode::Table,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Table => "table",
            OutputMode::Json => "json",
            OutputMode::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Sink = Mutex<Box<dyn Write + Send>>;

/// Where a command writes its output.
#[derive(Clone)]
pub struct Destination {
    sink: Arc<Sink>,
}

impl Destination {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates (or truncates) a file destination.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        validate_path(path)?;
        Ok(Self::new(File::create(path)?))
    }

    /// An in-memory destination and a handle to read back what it got.
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        (Self::new(captured.clone()), captured)
    }

    /// Identity shared by every clone of this destination.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.sink) as *const () as usize
    }

    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut sink = self.sink.lock();
        sink.write_all(bytes)?;
        sink.flush()
    }

    /// Runs `f` with exclusive access to the writer, then flushes.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut dyn Write) -> io::Result<R>) -> io::Result<R> {
        let mut sink = self.sink.lock();
        let result = f(&mut **sink)?;
        sink.flush()?;
        Ok(result)
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination").field("id", &self.id()).finish()
    }
}

/// Bytes written to a [`Destination::capture`] destination.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Takes everything written so far, leaving the buffer empty.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.buf.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn validate_path(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory does not exist: {}", parent.display()),
            ));
        }
    }
    Ok(())
}
