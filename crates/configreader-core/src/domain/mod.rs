//! Domain entities for configreader.
//!
//! Everything here is plain data plus the rules that govern it: section and
//! key uniqueness, in-place overwrites, the `main` default section and its
//! bootstrap entry, and the coercion of stored text into typed values.
//!
//! Values are always stored as text because INI has no native types.  Typing
//! happens only on the read side (see [`value::coerce`]), so a document written
//! back to disk is byte-for-byte what the caller stored.

/// Ordered section/key/value document.
pub mod document;

/// Typed values produced by read-time coercion.
pub mod value;
