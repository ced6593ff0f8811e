//! Infrastructure layer for configuration sessions.
//!
//! Contains the OS-facing adapters: file and handle storage, and the process
//! environment used by the env export.
//!
//! **Dependency rule**: this layer may depend on `configreader_core` but MUST
//! NOT import the `application` layer.

pub mod environment;
pub mod storage;
