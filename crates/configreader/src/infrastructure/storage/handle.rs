//! Shareable file handles with write invalidation.
//!
//! A [`ConfigFile`] is an open file (or in-memory buffer) that both the caller
//! and a configuration session can hold at the same time.  Clones share one
//! underlying stream and one status flag, so when a session rebinds to a new
//! path or is closed, every clone the caller kept stops accepting writes.
//!
//! # Handle status
//!
//! ```text
//! Open ──rebind──► Superseded   (reads allowed, writes fail)
//!   │                  │
//!   └──────close───────┴──► Closed   (reads and writes fail)
//! ```
//!
//! # Access modes
//!
//! Rust's `std::fs::File` does not remember which mode it was opened with, so
//! a `ConfigFile` records it.  Sessions only accept [`AccessMode::ReadWrite`]
//! handles; see [`crate::ConfigError::Mode`].

use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::paths;
use crate::error::ConfigError;

/// Label used in errors for buffers with no file behind them.
const MEMORY_LABEL: &str = "<memory>";

/// How a handle was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    /// Opened for update: both reads and writes are allowed.
    ReadWrite,
}

impl AccessMode {
    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "read-only",
            AccessMode::WriteOnly => "write-only",
            AccessMode::ReadWrite => "read-write",
        }
    }
}

/// Lifecycle status shared by all clones of a [`ConfigFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleStatus {
    Open,
    /// A session rebound away from this handle; writes are rejected.
    Superseded { new_path: PathBuf },
    Closed,
}

#[derive(Debug)]
enum Stream {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

#[derive(Debug)]
struct HandleState {
    /// `None` once the handle is closed.
    stream: Option<Stream>,
    path: Option<PathBuf>,
    mode: AccessMode,
    status: HandleStatus,
}

impl HandleState {
    fn label(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(MEMORY_LABEL))
    }

    fn check_writable(&self) -> Result<(), ConfigError> {
        match &self.status {
            HandleStatus::Open => {}
            HandleStatus::Superseded { new_path } => {
                return Err(ConfigError::HandleSuperseded {
                    new_path: new_path.clone(),
                })
            }
            HandleStatus::Closed => return Err(ConfigError::HandleClosed),
        }
        if !self.mode.can_write() {
            return Err(ConfigError::Mode {
                mode: self.mode.label(),
            });
        }
        Ok(())
    }

    fn check_readable(&self) -> Result<(), ConfigError> {
        if self.status == HandleStatus::Closed {
            return Err(ConfigError::HandleClosed);
        }
        if !self.mode.can_read() {
            return Err(ConfigError::Mode {
                mode: self.mode.label(),
            });
        }
        Ok(())
    }

    fn stream(&mut self) -> Result<&mut Stream, ConfigError> {
        self.stream.as_mut().ok_or(ConfigError::HandleClosed)
    }
}

/// A cloneable handle to an open configuration file or in-memory buffer.
///
/// # Examples
///
/// ```rust
/// use configreader::{AccessMode, ConfigFile};
///
/// let buffer = ConfigFile::in_memory();
/// assert_eq!(buffer.mode(), AccessMode::ReadWrite);
/// buffer.write_text("[main]\n").unwrap();
/// assert_eq!(buffer.read_to_string().unwrap(), "[main]\n");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFile {
    inner: Arc<Mutex<HandleState>>,
}

impl ConfigFile {
    /// Opens `path` for update, creating it and truncating existing content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be opened.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(true);
        Self::open_file(path.as_ref(), &options, AccessMode::ReadWrite)
    }

    /// Opens an existing `path` for update without truncating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file does not exist or cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        Self::open_file(path.as_ref(), &options, AccessMode::ReadWrite)
    }

    /// Opens `path` with an explicit access mode.
    ///
    /// `WriteOnly` creates and truncates; `ReadWrite` creates without
    /// truncating; `ReadOnly` requires the file to exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be opened.
    pub fn open_with(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self, ConfigError> {
        let mut options = OpenOptions::new();
        match mode {
            AccessMode::ReadOnly => options.read(true),
            AccessMode::WriteOnly => options.write(true).create(true).truncate(true),
            AccessMode::ReadWrite => options.read(true).write(true).create(true),
        };
        Self::open_file(path.as_ref(), &options, mode)
    }

    /// Creates an empty read-write buffer with no file behind it.
    pub fn in_memory() -> Self {
        Self::from_text("")
    }

    /// Creates a read-write buffer pre-filled with `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_state(HandleState {
            stream: Some(Stream::Memory(Cursor::new(text.as_bytes().to_vec()))),
            path: None,
            mode: AccessMode::ReadWrite,
            status: HandleStatus::Open,
        })
    }

    fn open_file(path: &Path, options: &OpenOptions, mode: AccessMode) -> Result<Self, ConfigError> {
        let path = paths::absolutize(path)?;
        let file = options
            .open(&path)
            .map_err(|source| ConfigError::io(&path, source))?;
        debug!(path = %path.display(), mode = mode.label(), "opened handle");
        Ok(Self::from_state(HandleState {
            stream: Some(Stream::File(file)),
            path: Some(path),
            mode,
            status: HandleStatus::Open,
        }))
    }

    fn from_state(state: HandleState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, HandleState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Absolute path of the underlying file; `None` for in-memory buffers.
    pub fn path(&self) -> Option<PathBuf> {
        self.state().path.clone()
    }

    pub fn mode(&self) -> AccessMode {
        self.state().mode
    }

    pub fn status(&self) -> HandleStatus {
        self.state().status.clone()
    }

    /// Returns `true` while the handle accepts writes.
    pub fn is_writable(&self) -> bool {
        self.state().check_writable().is_ok()
    }

    /// Returns `true` if both handles share the same underlying stream.
    pub fn same_handle(&self, other: &ConfigFile) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Reads the whole content from the start, leaving the cursor at the end.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed, was not opened for reading, or on I/O errors.
    pub fn read_to_string(&self) -> Result<String, ConfigError> {
        let mut state = self.state();
        state.check_readable()?;
        let label = state.label();
        let mut text = String::new();
        let result = match state.stream()? {
            Stream::File(file) => file
                .seek(SeekFrom::Start(0))
                .and_then(|_| file.read_to_string(&mut text)),
            Stream::Memory(cursor) => {
                cursor.set_position(0);
                cursor.read_to_string(&mut text)
            }
        };
        result.map_err(|source| ConfigError::io(label, source))?;
        Ok(text)
    }

    /// Replaces the whole content with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HandleSuperseded`] or [`ConfigError::HandleClosed`]
    /// once the handle has been invalidated, or the underlying I/O error.
    pub fn replace_contents(&self, text: &str) -> Result<(), ConfigError> {
        let mut state = self.state();
        state.check_writable()?;
        let label = state.label();
        let result = match state.stream()? {
            Stream::File(file) => file
                .set_len(0)
                .and_then(|_| file.seek(SeekFrom::Start(0)))
                .and_then(|_| file.write_all(text.as_bytes()))
                .and_then(|_| file.flush()),
            Stream::Memory(cursor) => {
                cursor.get_mut().clear();
                cursor.set_position(0);
                cursor.write_all(text.as_bytes())
            }
        };
        result.map_err(|source| ConfigError::io(label, source))
    }

    /// Writes `text` at the current position.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigFile::replace_contents`].  An empty `text` still fails
    /// on an invalidated handle.
    pub fn write_text(&self, text: &str) -> Result<(), ConfigError> {
        let mut state = self.state();
        state.check_writable()?;
        let label = state.label();
        let result = match state.stream()? {
            Stream::File(file) => file.write_all(text.as_bytes()),
            Stream::Memory(cursor) => cursor.write_all(text.as_bytes()),
        };
        result.map_err(|source| ConfigError::io(label, source))
    }

    /// Marks the handle as superseded by `new_path`.  Only affects open handles.
    pub(crate) fn supersede(&self, new_path: &Path) {
        let mut state = self.state();
        if state.status == HandleStatus::Open {
            state.status = HandleStatus::Superseded {
                new_path: new_path.to_path_buf(),
            };
        }
    }

    /// Flushes and closes the handle.  Idempotent.
    pub fn close(&self) {
        let mut state = self.state();
        if let Some(Stream::File(mut file)) = state.stream.take() {
            if let Err(err) = file.flush() {
                debug!(error = %err, "flush on close failed");
            }
        }
        state.status = HandleStatus::Closed;
    }
}

impl Write for ConfigFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state();
        state.check_writable()?;
        match state.stream()? {
            Stream::File(file) => file.write(buf),
            Stream::Memory(cursor) => cursor.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.state();
        match state.stream()? {
            Stream::File(file) => file.flush(),
            Stream::Memory(_) => Ok(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
