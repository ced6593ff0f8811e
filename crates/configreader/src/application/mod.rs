//! Application layer: configuration sessions and their export adapters.
//!
//! # Sub-modules
//!
//! - **`session`** – [`session::ConfigReader`], the open → mutate → commit →
//!   close lifecycle around one document and its storage binding.
//!
//! - **`scope`** – [`scope::ScopedReader`], a guard that commits and closes a
//!   session when it leaves scope, including during a panic.
//!
//! - **`export`** – Renders a document as JSON or sets it into the process
//!   environment as `SECTION_KEY=value` variables.

pub mod export;
pub mod scope;
pub mod session;
