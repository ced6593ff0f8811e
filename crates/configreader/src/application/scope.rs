//! Scoped session acquisition.
//!
//! A [`ScopedReader`] wraps a [`ConfigReader`] and, when it goes out of scope,
//! commits pending changes and closes the session.  Because this runs in
//! `Drop`, it also happens while unwinding from a panic.  Errors during drop
//! cannot be returned, so they are logged; call [`ScopedReader::finish`] to
//! observe them instead.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use super::session::ConfigReader;
use crate::error::ConfigError;

/// Guard that commits and closes its session on drop.
///
/// # Examples
///
/// ```rust
/// use configreader::{ConfigFile, ConfigReader};
///
/// let handle = ConfigFile::in_memory();
/// {
///     let mut config = ConfigReader::from_handle(handle.clone()).unwrap().into_scoped();
///     config.set("name", "First").unwrap();
/// }
/// assert!(!handle.is_writable());
/// ```
#[derive(Debug)]
pub struct ScopedReader {
    reader: ConfigReader,
}

impl ScopedReader {
    pub fn new(reader: ConfigReader) -> Self {
        Self { reader }
    }

    /// Commits and closes now, returning the commit error if any.
    ///
    /// The session is closed even when the commit fails.  A session already
    /// closed inside the scope is left as is.
    pub fn finish(mut self) -> Result<(), ConfigError> {
        self.commit_and_close()
    }

    fn commit_and_close(&mut self) -> Result<(), ConfigError> {
        if self.reader.is_closed() {
            return Ok(());
        }
        let committed = self.reader.commit();
        self.reader.close();
        committed
    }
}

impl Deref for ScopedReader {
    type Target = ConfigReader;

    fn deref(&self) -> &ConfigReader {
        &self.reader
    }
}

impl DerefMut for ScopedReader {
    fn deref_mut(&mut self) -> &mut ConfigReader {
        &mut self.reader
    }
}

impl Drop for ScopedReader {
    fn drop(&mut self) {
        if let Err(err) = self.commit_and_close() {
            warn!(
                path = %self.reader.path().display(),
                error = %err,
                "failed to commit configuration on scope exit"
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
