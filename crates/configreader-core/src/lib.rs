//! # configreader-core
//!
//! Pure building blocks for the configreader engine: the ordered
//! section/key/value document, read-time value coercion, the INI text codec,
//! and the exact/fuzzy value search.
//!
//! This crate never touches the file system or the process environment.
//! Storage bindings, sessions and export adapters live in the `configreader`
//! crate, which depends on this one.
//!
//! # Architecture overview
//!
//! - **`domain`** – The [`Document`] (ordered sections of ordered key/value
//!   pairs, with the `main` default section) and the [`Value`] type that raw
//!   strings are coerced into on read.
//!
//! - **`format`** – How a document travels to and from disk.  INI text is
//!   parsed into a [`Document`] and serialized back with section and key
//!   order preserved.
//!
//! - **`search`** – Scans every stored value for an exact match or for the
//!   most similar value above a similarity threshold.

pub mod domain;
pub mod format;
pub mod search;

pub use domain::document::{
    Document, Entry, Section, BOOTSTRAP_KEY, BOOTSTRAP_VALUE, DEFAULT_SECTION,
};
pub use domain::value::{coerce, Value, NONE_MARKER};
pub use format::codec::{check_entry, parse, serialize, EntryError, ParseError};
pub use search::{search, SearchError, SearchHit, SearchOptions, DEFAULT_THRESHOLD};
