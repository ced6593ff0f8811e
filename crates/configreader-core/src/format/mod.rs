//! On-disk format for configuration documents.
//!
//! The backing file is plain INI text:
//!
//! ```ini
//! [main]
//! reader = configreader
//!
//! [first]
//! count = 0
//! ```
//!
//! [`codec::parse`] turns text into a [`crate::Document`] and
//! [`codec::serialize`] writes one back.  Comments (`#`, `;`) are accepted on
//! input but not preserved.  [`codec::check_entry`] tells whether a name/value
//! pair can be written and read back unchanged.

pub mod codec;

pub use codec::{check_entry, parse, serialize, EntryError, ParseError};
