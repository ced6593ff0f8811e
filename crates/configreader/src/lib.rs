//! # configreader
//!
//! INI-backed configuration sessions.  A session loads one document from a
//! path or an open read-write handle, bootstraps a `main` section with
//! `reader = configreader` when the storage is empty, coerces values on read,
//! searches values exactly or by similarity, and exports to JSON or to
//! environment variables.
//!
//! # Architecture overview
//!
//! ```text
//! configreader_core   Document, Value, INI codec, search   (pure)
//!        ↑
//! application/        ConfigReader session, ScopedReader, export
//!        ↑
//! infrastructure/     ConfigFile handles, StorageBinding, environment sink
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use configreader::{ConfigFile, ConfigReader, SearchOptions, Value};
//!
//! let mut config = ConfigReader::from_handle(ConfigFile::in_memory()).unwrap();
//! config.set_in("db", "port", 5432).unwrap();
//! config.set("debug", true).unwrap();
//!
//! assert_eq!(config.get_in("db", "port"), Value::Int(5432));
//! assert_eq!(config.get("debug"), Value::Bool(true));
//!
//! let hit = config.search("reader", &SearchOptions::default()).unwrap();
//! assert_eq!(hit.unwrap().as_tuple(), ("reader", "configreader", "main"));
//! ```

pub mod application;
pub mod error;
pub mod infrastructure;

pub use application::scope::ScopedReader;
pub use application::session::{ConfigReader, Items, Sections, SessionState};
pub use error::ConfigError;
pub use infrastructure::environment::mock::RecordingEnvironment;
pub use infrastructure::environment::{EnvironmentSink, ProcessEnvironment};
pub use infrastructure::storage::{AccessMode, Binding, ConfigFile, HandleStatus, StorageBinding};

pub use configreader_core::{
    Document, EntryError, SearchHit, SearchOptions, Value, DEFAULT_SECTION, DEFAULT_THRESHOLD,
};
