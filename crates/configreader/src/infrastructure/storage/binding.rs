//! Association between a session and its backing storage.
//!
//! A session is backed either by a path (read and written with whole-file
//! operations) or by a caller-supplied [`ConfigFile`].  Rebinding always
//! switches to a path; the previous handle is invalidated for writes and the
//! previous file is left untouched on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::handle::{AccessMode, ConfigFile, HandleStatus};
use super::paths;
use crate::error::ConfigError;

/// What a session reads from and writes to.
#[derive(Debug, Clone)]
pub enum Binding {
    Path(PathBuf),
    /// `path` is the handle's own file path, or the resolved fallback path for
    /// in-memory buffers.
    Handle { handle: ConfigFile, path: PathBuf },
}

/// The storage side of a session.
#[derive(Debug)]
pub struct StorageBinding {
    target: Binding,
}

impl StorageBinding {
    /// Binds to `handle` if given, otherwise to `path` (or the default path).
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Mode`] if the handle is not open for reading and writing.
    /// - [`ConfigError::HandleSuperseded`] if a rebind already moved away from
    ///   the handle.
    /// - [`ConfigError::HandleClosed`] if the handle is closed.
    /// - [`ConfigError::NoHomeDir`] if no path is available at all.
    pub fn bind(path: Option<&Path>, handle: Option<ConfigFile>) -> Result<Self, ConfigError> {
        let Some(handle) = handle else {
            let path = paths::resolve(path)?;
            debug!(path = %path.display(), "bound to path");
            return Ok(Self {
                target: Binding::Path(path),
            });
        };

        let mode = handle.mode();
        if mode != AccessMode::ReadWrite {
            return Err(ConfigError::Mode { mode: mode.label() });
        }
        match handle.status() {
            HandleStatus::Open => {}
            HandleStatus::Superseded { new_path } => {
                return Err(ConfigError::HandleSuperseded { new_path });
            }
            HandleStatus::Closed => return Err(ConfigError::HandleClosed),
        }
        if path.is_some() {
            debug!("both a path and a handle were supplied; the handle wins");
        }

        let path = match handle.path() {
            Some(own) => own,
            None => paths::resolve(path)?,
        };
        debug!(path = %path.display(), "bound to handle");
        Ok(Self {
            target: Binding::Handle { handle, path },
        })
    }

    /// Absolute path of the backing storage.
    pub fn path(&self) -> &Path {
        match &self.target {
            Binding::Path(path) => path,
            Binding::Handle { path, .. } => path,
        }
    }

    pub fn target(&self) -> &Binding {
        &self.target
    }

    pub fn is_handle(&self) -> bool {
        matches!(self.target, Binding::Handle { .. })
    }

    /// Reads the current content.  A path that does not exist yet yields `None`.
    pub fn load(&self) -> Result<Option<String>, ConfigError> {
        match &self.target {
            Binding::Path(path) => match fs::read_to_string(path) {
                Ok(text) => Ok(Some(text)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(source) => Err(ConfigError::io(path, source)),
            },
            Binding::Handle { handle, .. } => handle.read_to_string().map(Some),
        }
    }

    /// Replaces the stored content with `text`, creating the file and its
    /// parent directories when bound to a path.
    pub fn persist(&self, text: &str) -> Result<(), ConfigError> {
        match &self.target {
            Binding::Path(path) => {
                if let Some(dir) = path.parent() {
                    fs::create_dir_all(dir).map_err(|source| ConfigError::io(dir, source))?;
                }
                fs::write(path, text).map_err(|source| ConfigError::io(path, source))
            }
            Binding::Handle { handle, .. } => handle.replace_contents(text),
        }
    }

    /// Switches to `new_path`.  A previously bound handle stops accepting
    /// writes; nothing is written to either location.
    pub fn rebind(&mut self, new_path: &Path) -> Result<(), ConfigError> {
        let new_path = paths::absolutize(new_path)?;
        if let Binding::Handle { handle, .. } = &self.target {
            handle.supersede(&new_path);
        }
        info!(
            from = %self.path().display(),
            to = %new_path.display(),
            "rebinding storage"
        );
        self.target = Binding::Path(new_path);
        Ok(())
    }

    /// Closes a bound handle.  Path bindings hold nothing open.
    pub fn release(&self) {
        if let Binding::Handle { handle, .. } = &self.target {
            handle.close();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_wins_over_path() {
        let handle = ConfigFile::in_memory();
        let binding =
            StorageBinding::bind(Some(Path::new("/tmp/ignored.ini")), Some(handle)).unwrap();
        assert!(binding.is_handle());
    }

    #[test]
    fn test_in_memory_handle_falls_back_to_given_path() {
        let binding =
            StorageBinding::bind(Some(Path::new("/tmp/label.ini")), Some(ConfigFile::in_memory()))
                .unwrap();
        assert_eq!(binding.path(), Path::new("/tmp/label.ini"));
    }

    #[test]
    fn test_closed_handle_is_rejected() {
        let handle = ConfigFile::in_memory();
        handle.close();
        let err = StorageBinding::bind(Some(Path::new("/tmp/x.ini")), Some(handle)).unwrap_err();
        assert!(matches!(err, ConfigError::HandleClosed));
    }

    #[test]
    fn test_superseded_handle_is_rejected_with_new_path() {
        // Arrange
        let handle = ConfigFile::from_text("[main]\n");
        let mut first =
            StorageBinding::bind(Some(Path::new("/tmp/a.ini")), Some(handle.clone())).unwrap();
        first.rebind(Path::new("/tmp/b.ini")).unwrap();

        // Act
        let err = StorageBinding::bind(None, Some(handle)).unwrap_err();

        // Assert
        match err {
            ConfigError::HandleSuperseded { new_path } => {
                assert_eq!(new_path, PathBuf::from("/tmp/b.ini"));
            }
            other => panic!("expected HandleSuperseded, got {other:?}"),
        }
    }

    #[test]
    fn test_rebind_supersedes_handle() {
        // Arrange
        let handle = ConfigFile::from_text("[main]\n");
        let mut binding =
            StorageBinding::bind(Some(Path::new("/tmp/a.ini")), Some(handle.clone())).unwrap();

        // Act
        binding.rebind(Path::new("/tmp/b.ini")).unwrap();

        // Assert
        assert!(!binding.is_handle());
        assert_eq!(binding.path(), Path::new("/tmp/b.ini"));
        assert_eq!(
            handle.status(),
            HandleStatus::Superseded {
                new_path: PathBuf::from("/tmp/b.ini")
            }
        );
    }

    #[test]
    fn test_load_missing_path_is_none() {
        let path = std::env::temp_dir().join("configreader-binding-does-not-exist.ini");
        let binding = StorageBinding::bind(Some(path.as_path()), None).unwrap();
        assert!(binding.load().unwrap().is_none());
    }

    #[test]
    fn test_persist_through_handle_replaces_contents() {
        let handle = ConfigFile::from_text("old old old");
        let binding =
            StorageBinding::bind(Some(Path::new("/tmp/x.ini")), Some(handle.clone())).unwrap();

        binding.persist("new").unwrap();

        assert_eq!(handle.read_to_string().unwrap(), "new");
    }
}
