//! Configuration sessions: open, read, mutate, commit and close.
//!
//! A [`ConfigReader`] owns one [`Document`] and the [`StorageBinding`] it was
//! loaded from.  Mutations change the in-memory document; they reach storage
//! only through [`ConfigReader::commit`] or a mutation called with
//! `commit = true`.
//!
//! # Session states
//!
//! ```text
//! open ──► Open ──close()──► Closed
//! ```
//!
//! `Closed` is terminal.  Mutating, committing, reloading or rebinding a
//! closed session fails with [`ConfigError::Closed`]; reads and exports keep
//! working on the last in-memory snapshot.

use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use configreader_core::{
    check_entry, coerce, parse, search, serialize, Document, SearchHit, SearchOptions, Value,
    DEFAULT_SECTION,
};
use tracing::{debug, info};

use super::export;
use super::scope::ScopedReader;
use crate::error::ConfigError;
use crate::infrastructure::environment::{EnvironmentSink, ProcessEnvironment};
use crate::infrastructure::storage::{ConfigFile, StorageBinding};

/// Lifecycle state of a [`ConfigReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Read-only snapshot of section names in store order.
///
/// There is no way to replace a session's sections through this type:
///
/// ```compile_fail
/// use configreader::{ConfigFile, ConfigReader};
///
/// let reader = ConfigReader::from_handle(ConfigFile::in_memory()).unwrap();
/// let sections = reader.sections();
/// sections[0] = String::from("other");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections(Vec<String>);

impl Sections {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|s| s == name)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl Deref for Sections {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Keys of one section with their coerced values, in store order.
///
/// ```rust
/// use configreader::{ConfigFile, ConfigReader, Value};
///
/// let mut reader = ConfigReader::from_handle(ConfigFile::in_memory()).unwrap();
/// reader.set("zeta", 1).unwrap();
/// reader.set("alpha", 2).unwrap();
///
/// let items = reader.get_items("main");
/// assert_eq!(items.keys().collect::<Vec<_>>(), ["reader", "zeta", "alpha"]);
/// assert_eq!(items.get("alpha"), Some(&Value::Int(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Items(Vec<(String, Value)>);

impl Items {
    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, Value)> {
        self.0
    }
}

impl IntoIterator for Items {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for Items {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An open configuration session.
///
/// # Examples
///
/// ```rust
/// use configreader::{ConfigFile, ConfigReader, Value};
///
/// let mut reader = ConfigReader::from_handle(ConfigFile::in_memory()).unwrap();
/// reader.set("retries", 3).unwrap();
/// assert_eq!(reader.get("retries"), Value::Int(3));
/// assert_eq!(reader.get("reader"), "configreader");
/// ```
#[derive(Debug)]
pub struct ConfigReader {
    document: Document,
    binding: StorageBinding,
    state: SessionState,
}

impl ConfigReader {
    // ── Construction ──────────────────────────────────────────────────────────

    /// Opens a session on `handle` if given, otherwise on `path`, otherwise on
    /// `<home>/settings.ini`.
    ///
    /// Existing content is parsed.  Missing or blank content is replaced in
    /// memory by the bootstrap document (`[main] reader = configreader`); an
    /// empty handle also receives that content immediately.  A path binding
    /// creates nothing on disk until the first commit.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Mode`] if `handle` is not open for reading and writing.
    /// - [`ConfigError::Parse`] if the existing content is not valid INI.
    /// - [`ConfigError::Io`] on read failures.
    pub fn new(path: Option<&Path>, handle: Option<ConfigFile>) -> Result<Self, ConfigError> {
        let binding = StorageBinding::bind(path, handle)?;
        let (document, bootstrapped) = load_document(&binding)?;
        if bootstrapped && binding.is_handle() {
            binding.persist(&serialize(&document))?;
            debug!("seeded empty handle with bootstrap content");
        }
        info!(
            path = %binding.path().display(),
            sections = document.sections().len(),
            "opened configuration session"
        );
        Ok(Self {
            document,
            binding,
            state: SessionState::Open,
        })
    }

    /// Opens a session bound to `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::new(Some(path.as_ref()), None)
    }

    /// Opens a session bound to `<home>/settings.ini`.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::new(None, None)
    }

    /// Opens a session bound to an open read-write handle.
    pub fn from_handle(handle: ConfigFile) -> Result<Self, ConfigError> {
        Self::new(None, Some(handle))
    }

    /// Consumes the session into a guard that commits and closes on drop.
    pub fn into_scoped(self) -> ScopedReader {
        ScopedReader::new(self)
    }

    /// Runs `f` on the session, then commits and closes it.
    ///
    /// The commit and close happen on every exit path, including an error
    /// returned by `f` and a panic inside it.  An error from `f` takes
    /// precedence over a commit error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use configreader::{ConfigFile, ConfigReader};
    ///
    /// let handle = ConfigFile::in_memory();
    /// let reader = ConfigReader::from_handle(handle.clone()).unwrap();
    /// reader
    ///     .scoped(|config| config.set("name", "First"))
    ///     .unwrap();
    /// assert!(handle.read_to_string().is_err()); // closed on exit
    /// ```
    pub fn scoped<T, E, F>(self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ConfigReader) -> Result<T, E>,
        E: From<ConfigError>,
    {
        let mut guard = self.into_scoped();
        let result = f(&mut *guard);
        let finished = guard.finish();
        let value = result?;
        finished?;
        Ok(value)
    }

    // ── State & binding ───────────────────────────────────────────────────────

    /// Absolute path of the backing storage.
    pub fn path(&self) -> &Path {
        self.binding.path()
    }

    /// Rebinds the session to `path`.
    ///
    /// The previous file is left untouched, a previously bound handle stops
    /// accepting writes, and `path` is not created until the next commit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Closed`] on a closed session.
    pub fn set_path(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.ensure_open()?;
        self.binding.rebind(path.as_ref())
    }

    pub fn binding(&self) -> &StorageBinding {
        &self.binding
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// The in-memory document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Snapshot of section names, `main` included.
    pub fn sections(&self) -> Sections {
        Sections(self.document.section_names())
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// Coerced value of `key` in `main`, or [`Value::Null`] if missing.
    pub fn get(&self, key: &str) -> Value {
        self.get_in(DEFAULT_SECTION, key)
    }

    /// Coerced value of `key` in `section`, or [`Value::Null`] if missing.
    pub fn get_in(&self, section: &str, key: &str) -> Value {
        self.get_or(section, key, Value::Null)
    }

    /// Coerced value of `key` in `section`, or `default` as given if missing.
    pub fn get_or(&self, section: &str, key: &str, default: impl Into<Value>) -> Value {
        match self.document.get(section, key) {
            Some(raw) => coerce(raw),
            None => default.into(),
        }
    }

    /// All keys of `section` with coerced values in store order; empty if the
    /// section is missing.
    pub fn get_items(&self, section: &str) -> Items {
        self.document
            .section(section)
            .map(|s| {
                s.entries()
                    .iter()
                    .map(|e| (e.key.clone(), coerce(&e.value)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Searches every stored value.  See [`configreader_core::search()`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Threshold`] if the threshold is outside `[0, 1]`.
    pub fn search(&self, word: &str, opts: &SearchOptions) -> Result<Option<SearchHit>, ConfigError> {
        Ok(search(&self.document, word, opts)?)
    }

    /// Every section with its coerced items, both in store order.  When `out`
    /// is given a listing is also written to it.
    pub fn show(&self, out: Option<&mut dyn Write>) -> Result<Vec<(String, Items)>, ConfigError> {
        if let Some(out) = out {
            render(&self.document, out).map_err(|source| ConfigError::io("<output>", source))?;
        }
        Ok(self
            .document
            .section_names()
            .into_iter()
            .map(|name| {
                let items = self.get_items(&name);
                (name, items)
            })
            .collect())
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Sets `key` in `main` without committing.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.set_with(DEFAULT_SECTION, key, value, false)
    }

    /// Sets `key` in `section` without committing.
    pub fn set_in(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ConfigError> {
        self.set_with(section, key, value, false)
    }

    /// Sets `key` in `section`, creating the section if needed, and commits
    /// when `commit` is true.  The value is stored in its string form:
    /// `None` becomes `"None"` and booleans `"True"`/`"False"`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Closed`] on a closed session.
    /// - [`ConfigError::Entry`] if the section or key could not be read back
    ///   unchanged, such as a key with surrounding whitespace or a delimiter.
    ///   Nothing is changed in that case.
    /// - A commit error.
    pub fn set_with(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<Value>,
        commit: bool,
    ) -> Result<(), ConfigError> {
        self.ensure_open()?;
        let stored = value.into().to_stored();
        check_entry(section, key, &stored)?;
        debug!(section, key, value = %stored, "set");
        self.document.set(section, key, stored);
        self.commit_if(commit)
    }

    /// Removes `section`.  Removing `main` is allowed; it comes back on the
    /// next write to it.  Missing sections are ignored.
    pub fn remove_section(&mut self, section: &str, commit: bool) -> Result<(), ConfigError> {
        self.ensure_open()?;
        if self.document.remove_section(section) {
            debug!(section, "removed section");
        }
        self.commit_if(commit)
    }

    /// Removes `key` from `section`.  Missing keys and sections are ignored.
    pub fn remove_key(&mut self, section: &str, key: &str, commit: bool) -> Result<(), ConfigError> {
        self.ensure_open()?;
        if self.document.remove_key(section, key) {
            debug!(section, key, "removed key");
        }
        self.commit_if(commit)
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Writes the whole document to the bound storage, replacing its content.
    /// Creates the file (and parent directories) for a path binding.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Closed`] on a closed session.
    /// - [`ConfigError::HandleSuperseded`] / [`ConfigError::HandleClosed`] if
    ///   the bound handle was invalidated elsewhere.
    /// - [`ConfigError::Io`] on write failures.
    pub fn commit(&mut self) -> Result<(), ConfigError> {
        self.ensure_open()?;
        self.binding.persist(&serialize(&self.document))?;
        debug!(path = %self.path().display(), "committed");
        Ok(())
    }

    /// Re-reads the bound storage, discarding uncommitted changes.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.ensure_open()?;
        let (document, _) = load_document(&self.binding)?;
        self.document = document;
        info!(path = %self.path().display(), "reloaded configuration");
        Ok(())
    }

    /// Releases the bound handle and enters the terminal `Closed` state.
    /// Uncommitted changes are not written.  Idempotent.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.binding.release();
        self.state = SessionState::Closed;
        debug!(path = %self.path().display(), "closed configuration session");
    }

    // ── Export ────────────────────────────────────────────────────────────────

    /// JSON text of the document's raw values; also written to `sink` if given.
    pub fn to_json(&self, sink: Option<&mut dyn Write>) -> Result<String, ConfigError> {
        export::to_json(&self.document, sink)
    }

    /// Sets `SECTION_KEY=value` in the process environment for every entry.
    ///
    /// This mutates process-wide state visible to every thread and to child
    /// processes spawned afterwards.  Returns the number of variables set.
    pub fn to_env(&self) -> usize {
        self.to_env_with(&mut ProcessEnvironment)
    }

    /// Same as [`ConfigReader::to_env`] but into a caller-supplied sink.
    pub fn to_env_with(&self, sink: &mut dyn EnvironmentSink) -> usize {
        export::to_env(&self.document, sink)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), ConfigError> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Closed => Err(ConfigError::Closed),
        }
    }

    fn commit_if(&mut self, commit: bool) -> Result<(), ConfigError> {
        if commit {
            self.commit()
        } else {
            Ok(())
        }
    }
}

/// Parses the bound content.  Returns the document and whether it was
/// bootstrapped because the content was missing or blank.
fn load_document(binding: &StorageBinding) -> Result<(Document, bool), ConfigError> {
    let text = binding.load()?;
    match text {
        Some(text) if !text.trim().is_empty() => {
            let mut document = parse(&text).map_err(|source| ConfigError::Parse {
                path: PathBuf::from(binding.path()),
                source,
            })?;
            document.ensure_default_section();
            Ok((document, false))
        }
        _ => {
            debug!(path = %binding.path().display(), "no content found, bootstrapping defaults");
            Ok((Document::bootstrap(), true))
        }
    }
}

fn render(document: &Document, out: &mut dyn Write) -> std::io::Result<()> {
    for section in document.sections() {
        writeln!(out, "[{}]", section.name())?;
        for entry in section.entries() {
            writeln!(out, "  {} = {}", entry.key, coerce(&entry.value))?;
        }
    }
    out.flush()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
