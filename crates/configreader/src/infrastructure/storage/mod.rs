//! Storage infrastructure: where a session's INI text lives.
//!
//! - `handle` – [`ConfigFile`], a shareable open file or in-memory buffer that
//!   can be invalidated for writes.
//! - `paths` – default and relative path resolution.
//! - `binding` – [`StorageBinding`], the path-or-handle a session reads from
//!   and commits to.

pub mod binding;
pub mod handle;
pub mod paths;

pub use binding::{Binding, StorageBinding};
pub use handle::{AccessMode, ConfigFile, HandleStatus};
