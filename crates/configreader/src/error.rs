//! Error type for configuration sessions.
//!
//! Every failure a caller can observe from this crate is a [`ConfigError`].
//! Errors are raised where the violation happens and are never retried
//! internally.  Reads of missing keys or sections are not errors, and neither
//! is removing something that does not exist.

use std::io;
use std::path::PathBuf;

use configreader_core::{EntryError, ParseError, SearchError};
use thiserror::Error;

/// Error type for configuration session operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A supplied handle is not open for both reading and writing.
    #[error("handle must be open for reading and writing, got {mode} access")]
    Mode { mode: &'static str },

    /// A search threshold outside `[0, 1]`.
    #[error(transparent)]
    Threshold(#[from] SearchError),

    /// A section or key name that would not read back unchanged after a commit.
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// A mutating or persisting call on a closed session.
    #[error("configuration session is closed")]
    Closed,

    /// A write through a handle that a rebind has superseded.
    #[error("handle was superseded by a rebind to {new_path:?} and no longer accepts writes")]
    HandleSuperseded { new_path: PathBuf },

    /// A read or write through a handle that has been closed.
    #[error("handle has been closed")]
    HandleClosed,

    /// The backing content is not valid INI text.
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to a JSON sink failed.
    #[error("failed to export JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No path was given and the home directory could not be determined.
    #[error("could not determine the home directory for the default settings file")]
    NoHomeDir,
}

impl ConfigError {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Lets [`ConfigError`] travel through `std::io::Write` implementations.
impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
