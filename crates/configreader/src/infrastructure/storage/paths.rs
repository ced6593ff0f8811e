//! Storage path resolution.
//!
//! Sessions always report an absolute path.  A missing path falls back to
//! `settings.ini` in the user's home directory; a relative path is resolved
//! against the current working directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name used when no path is supplied.
pub const DEFAULT_FILE_NAME: &str = "settings.ini";

/// Returns `<home>/settings.ini`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDir`] if the home directory is unknown.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Makes `path` absolute without touching the file system beyond reading the
/// current directory.  `.` components are dropped.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the current directory cannot be read.
pub fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.components().collect());
    }
    let cwd = std::env::current_dir().map_err(|source| ConfigError::io(path, source))?;
    Ok(cwd.join(path).components().collect())
}

/// Resolves an optional user-supplied path to the absolute storage path.
pub fn resolve(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(path) => absolutize(path),
        None => default_path(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
