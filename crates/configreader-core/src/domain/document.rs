//! Ordered section/key/value document.
//!
//! A [`Document`] is an ordered list of [`Section`]s, each an ordered list of
//! [`Entry`]s.  Order matters: sections and keys are written back to disk in
//! the order they were first created, and search scans them in that order.
//!
//! # Why `Vec` and not `HashMap`? (for beginners)
//!
//! A `HashMap` gives O(1) lookup but forgets insertion order, so a file would
//! come back from disk with its sections shuffled.  Configuration documents
//! are small (tens of keys), so a linear scan over a `Vec` costs nothing and
//! keeps the on-disk layout stable.
//!
//! # The default section
//!
//! Operations that do not name a section target [`DEFAULT_SECTION`] (`main`).
//! A freshly provisioned document is created by [`Document::bootstrap`], which
//! seeds `main` with `reader = configreader`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Section targeted when the caller does not name one.
pub const DEFAULT_SECTION: &str = "main";

/// Key of the entry seeded into a new document.
pub const BOOTSTRAP_KEY: &str = "reader";

/// Value of the entry seeded into a new document.
pub const BOOTSTRAP_VALUE: &str = "configreader";

/// One `key = value` pair.  The value is the raw stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// A named, ordered group of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Inserts or overwrites `key`.  Overwrites keep the key's position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(Entry { key, value }),
        }
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The in-memory configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Default for Document {
    /// An empty document that still carries the (empty) default section.
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only an empty `main` section.
    pub fn new() -> Self {
        Self {
            sections: vec![Section::new(DEFAULT_SECTION)],
        }
    }

    /// Creates a document with no sections at all, not even `main`.
    ///
    /// Used by the parser, which adds sections as it encounters headers.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Creates the document used for a new or empty backing store:
    /// `main` seeded with `reader = configreader`.
    pub fn bootstrap() -> Self {
        let mut doc = Self::new();
        doc.set(DEFAULT_SECTION, BOOTSTRAP_KEY, BOOTSTRAP_VALUE);
        doc
    }

    /// Appends an empty `main` section if the document has none.
    pub fn ensure_default_section(&mut self) {
        self.section_or_insert(DEFAULT_SECTION);
    }

    /// Returns the named section.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns the named section, appending an empty one if it is missing.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Sections in insertion order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in insertion order.
    pub fn section_names(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.clone()).collect()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Returns the raw text stored at `section`/`key`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Stores `value` at `section`/`key`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.section_or_insert(section).set(key, value);
    }

    /// Removes a whole section.  Returns `true` if it existed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    /// Removes a single key.  Missing sections and keys are not an error.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        self.sections
            .iter_mut()
            .find(|s| s.name == section)
            .map_or(false, |s| s.remove(key))
    }

    /// Iterates over every `(section, key, value)` triple in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.sections.iter().flat_map(|section| {
            section
                .entries
                .iter()
                .map(move |e| (section.name.as_str(), e.key.as_str(), e.value.as_str()))
        })
    }

    /// Returns `true` if no section holds any entry.
    pub fn is_blank(&self) -> bool {
        self.sections.iter().all(Section::is_empty)
    }
}

/// Serializes as `{ section: { key: raw_value, ... }, ... }` in store order.
impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &SectionEntries(section))?;
        }
        map.end()
    }
}

struct SectionEntries<'a>(&'a Section);

impl Serialize for SectionEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.entries.len()))?;
        for entry in &self.0.entries {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
