//! INI text codec.
//!
//! Grammar accepted by [`parse`]:
//! ```text
//! file      = { blank | comment | header | entry | continuation }
//! comment   = ('#' | ';') text                  ; whole-line only
//! header    = '[' name ']'
//! entry     = key ('=' | ':') value             ; first delimiter wins
//! continuation = indent text                    ; appended to previous value
//! ```
//! Keys and values are trimmed.  Repeated headers merge into the existing
//! section; repeated keys overwrite.  Section and key names are case-sensitive.
//! A `[` line that is not a well-formed header but has a delimiter is an entry.
//!
//! While an entry is open, every indented line continues its value, including
//! whitespace-only lines (kept as empty lines inside the value) and lines that
//! look like comments.  A completely empty line ends the entry.
//!
//! [`serialize`] is the inverse for trimmed values whose names pass
//! [`check_entry`]: every section is written as a header followed by its
//! entries and a blank line, and multi-line values are written as tab-indented
//! continuation lines.

use thiserror::Error;
use tracing::debug;

use crate::domain::document::Document;

/// Errors produced while parsing INI text.  Line numbers are 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// An entry appeared before the first `[section]` header.
    #[error("line {line}: entry found before any section header")]
    MissingSectionHeader { line: usize },

    /// A header line is not of the form `[name]`.
    #[error("line {line}: malformed section header {text:?}")]
    MalformedHeader { line: usize, text: String },

    /// A non-comment line contains neither `=` nor `:`.
    #[error("line {line}: expected `key = value`, got {text:?}")]
    MissingDelimiter { line: usize, text: String },

    /// The text before the delimiter is empty.
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
}

/// A section or key name that [`serialize`] cannot write so that [`parse`]
/// reads it back unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("section name {0:?} is empty, padded with whitespace, or spans lines")]
    Section(String),

    #[error("key {0:?} is empty, padded with whitespace, or contains a delimiter or line break")]
    Key(String),

    #[error("key {0:?} starts with a comment marker")]
    CommentKey(String),

    #[error("key {key:?} with this value would be read back as a section header")]
    HeaderLike { key: String },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses INI text into a [`Document`].
///
/// The result contains exactly the sections present in the text; callers that
/// need the `main` section to exist must add it themselves.
///
/// # Errors
///
/// Returns [`ParseError`] on the first malformed line.
///
/// # Examples
///
/// ```rust
/// use configreader_core::format::parse;
///
/// let doc = parse("[main]\nnew = False\n").unwrap();
/// assert_eq!(doc.get("main", "new"), Some("False"));
/// ```
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let mut doc = Document::empty();
    let mut section: Option<String> = None;
    // (section, key) of the entry a continuation line extends.
    let mut last_entry: Option<(String, String)> = None;
    // Whitespace-only lines seen inside the open entry, not yet attached.
    let mut pending_blank = 0usize;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        let indented = raw_line.starts_with(|c: char| c.is_whitespace());

        if let (true, Some((sec, key))) = (indented, &last_entry) {
            if trimmed.is_empty() {
                pending_blank += 1;
                continue;
            }
            let prev = doc.get(sec, key).unwrap_or_default();
            let joined = format!("{prev}{}{trimmed}", "\n".repeat(pending_blank + 1));
            doc.set(sec, key.clone(), joined);
            pending_blank = 0;
            continue;
        }
        pending_blank = 0;

        if trimmed.is_empty() {
            last_entry = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') {
            if let Some(name) = parse_header(trimmed) {
                if doc.has_section(name) {
                    debug!(line = line_no, section = name, "merging repeated section header");
                }
                doc.section_or_insert(name);
                section = Some(name.to_string());
                last_entry = None;
                continue;
            }
            if !trimmed.contains(['=', ':']) {
                return Err(ParseError::MalformedHeader {
                    line: line_no,
                    text: trimmed.to_string(),
                });
            }
        }

        let current = section
            .as_deref()
            .ok_or(ParseError::MissingSectionHeader { line: line_no })?;
        let (key, value) = split_entry(trimmed, line_no)?;
        doc.set(current, key, value);
        last_entry = Some((current.to_string(), key.to_string()));
    }

    Ok(doc)
}

/// Checks that `key` in `section` with `value` survives a
/// [`serialize`] → [`parse`] round trip under the same names.
///
/// # Errors
///
/// Returns the first [`EntryError`] that applies.
///
/// # Examples
///
/// ```rust
/// use configreader_core::format::{check_entry, EntryError};
///
/// assert!(check_entry("main", "motd", "line one\n\nline three").is_ok());
/// assert!(matches!(check_entry("main", " k", "v"), Err(EntryError::Key(_))));
/// ```
pub fn check_entry(section: &str, key: &str, value: &str) -> Result<(), EntryError> {
    if !is_clean_name(section) {
        return Err(EntryError::Section(section.to_string()));
    }
    if !is_clean_name(key) || key.contains(['=', ':']) {
        return Err(EntryError::Key(key.to_string()));
    }
    if key.starts_with(['#', ';']) {
        return Err(EntryError::CommentKey(key.to_string()));
    }
    let first_line = value.split('\n').next().unwrap_or_default();
    let written = format!("{key} = {first_line}");
    if parse_header(written.trim()).is_some() {
        return Err(EntryError::HeaderLike {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Serializes a [`Document`] to INI text.
///
/// # Examples
///
/// ```rust
/// use configreader_core::{format::serialize, Document};
///
/// let text = serialize(&Document::bootstrap());
/// assert_eq!(text, "[main]\nreader = configreader\n\n");
/// ```
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    for section in doc.sections() {
        out.push('[');
        out.push_str(section.name());
        out.push_str("]\n");
        for entry in section.entries() {
            out.push_str(&entry.key);
            out.push_str(" = ");
            out.push_str(&entry.value.replace('\n', "\n\t"));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

// ── Line helpers ──────────────────────────────────────────────────────────────

/// Non-empty, no surrounding whitespace, single line.
fn is_clean_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.contains(['\n', '\r'])
}

/// Returns the trimmed name inside `[...]`, or `None` if malformed or empty.
fn parse_header(line: &str) -> Option<&str> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    (!name.is_empty()).then_some(name)
}

fn split_entry(line: &str, line_no: usize) -> Result<(&str, &str), ParseError> {
    let pos = line
        .find(|c: char| c == '=' || c == ':')
        .ok_or_else(|| ParseError::MissingDelimiter {
            line: line_no,
            text: line.to_string(),
        })?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey { line: line_no });
    }
    Ok((key, line[pos + 1..].trim()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_section() {
        // Arrange
        let text = "[main]\nnew = False\n";

        // Act
        let doc = parse(text).expect("parse");

        // Assert
        assert_eq!(doc.section_names(), vec!["main"]);
        assert_eq!(doc.get("main", "new"), Some("False"));
    }

    #[test]
    fn test_parse_empty_text_yields_no_sections() {
        let doc = parse("").expect("parse");
        assert!(doc.sections().is_empty());
    }

    #[test]
    fn test_parse_accepts_colon_delimiter() {
        let doc = parse("[s]\nurl: http://host:80/x\n").expect("parse");
        // Only the first delimiter splits; the rest belongs to the value.
        assert_eq!(doc.get("s", "url"), Some("http://host:80/x"));
    }

    #[test]
    fn test_parse_first_delimiter_wins() {
        let doc = parse("[s]\nexpr = a=b\n").expect("parse");
        assert_eq!(doc.get("s", "expr"), Some("a=b"));
    }

    #[test]
    fn test_parse_empty_value() {
        let doc = parse("[main]\nempty =\n").expect("parse");
        assert_eq!(doc.get("main", "empty"), Some(""));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# top comment\n\n[main]\n; note\nkey = value\n\n";
        let doc = parse(text).expect("parse");
        assert_eq!(doc.get("main", "key"), Some("value"));
        assert_eq!(doc.section("main").map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_parse_continuation_lines_join_with_newline() {
        let text = "[main]\nmotd = first\n\tsecond\n    third\nnext = x\n";
        let doc = parse(text).expect("parse");
        assert_eq!(doc.get("main", "motd"), Some("first\nsecond\nthird"));
        assert_eq!(doc.get("main", "next"), Some("x"));
    }

    #[test]
    fn test_parse_repeated_section_merges() {
        let text = "[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\nx = 4\n";
        let doc = parse(text).expect("parse");
        assert_eq!(doc.section_names(), vec!["a", "b"]);
        assert_eq!(doc.get("a", "x"), Some("4"));
        assert_eq!(doc.get("a", "z"), Some("3"));
    }

    #[test]
    fn test_parse_entry_before_header_is_error() {
        let err = parse("orphan = 1\n[main]\n").unwrap_err();
        assert_eq!(err, ParseError::MissingSectionHeader { line: 1 });
    }

    #[test]
    fn test_parse_unterminated_header_is_error() {
        let err = parse("[main\nkey = v\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_parse_empty_header_is_error() {
        let err = parse("[  ]\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_parse_line_without_delimiter_is_error() {
        let err = parse("[main]\njust text\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingDelimiter { line: 2, .. }));
    }

    #[test]
    fn test_parse_empty_key_is_error() {
        let err = parse("[main]\n = v\n").unwrap_err();
        assert_eq!(err, ParseError::EmptyKey { line: 2 });
    }

    #[test]
    fn test_parse_bracket_line_with_delimiter_is_entry() {
        let doc = parse("[main]\n[x = 1\n").expect("parse");
        assert_eq!(doc.get("main", "[x"), Some("1"));
    }

    #[test]
    fn test_parse_indented_blank_line_stays_in_value() {
        // Arrange
        let text = "[main]\nmotd = line one\n\t\n\tline three\nnext = x\n";

        // Act
        let doc = parse(text).expect("parse");

        // Assert
        assert_eq!(doc.get("main", "motd"), Some("line one\n\nline three"));
        assert_eq!(doc.get("main", "next"), Some("x"));
    }

    #[test]
    fn test_parse_trailing_indented_blank_lines_are_dropped() {
        let doc = parse("[main]\nk = v\n   \n\t\n[other]\n").expect("parse");
        assert_eq!(doc.get("main", "k"), Some("v"));
        assert!(doc.has_section("other"));
    }

    #[test]
    fn test_parse_indented_comment_marker_continues_value() {
        let doc = parse("[main]\nk = a\n\t# not a comment\n").expect("parse");
        assert_eq!(doc.get("main", "k"), Some("a\n# not a comment"));
    }

    #[test]
    fn test_check_entry_rejects_names_that_cannot_round_trip() {
        assert!(matches!(check_entry("main", " k", "v"), Err(EntryError::Key(_))));
        assert!(matches!(check_entry("main", "k ", "v"), Err(EntryError::Key(_))));
        assert!(matches!(check_entry("main", "a=b", "v"), Err(EntryError::Key(_))));
        assert!(matches!(check_entry("main", "a:b", "v"), Err(EntryError::Key(_))));
        assert!(matches!(check_entry("main", "a\nb", "v"), Err(EntryError::Key(_))));
        assert!(matches!(check_entry("main", "", "v"), Err(EntryError::Key(_))));
        assert!(matches!(check_entry("main", "#k", "v"), Err(EntryError::CommentKey(_))));
        assert!(matches!(check_entry("main", ";k", "v"), Err(EntryError::CommentKey(_))));
        assert!(matches!(check_entry(" s", "k", "v"), Err(EntryError::Section(_))));
        assert!(matches!(check_entry("", "k", "v"), Err(EntryError::Section(_))));
        assert!(matches!(
            check_entry("main", "[x", "1]"),
            Err(EntryError::HeaderLike { .. })
        ));
    }

    #[test]
    fn test_checked_entries_survive_round_trip() {
        // Arrange
        let cases = [
            ("main", "motd", "line one\n\nline three"),
            ("main", "[x", "1"),
            ("[odd]", "k", "v"),
            ("main", "hash", "a # b"),
            ("main", "lead", "\nafter newline"),
            ("main", "comment_like", "a\n; b"),
        ];
        let mut doc = Document::bootstrap();
        for (section, key, value) in cases {
            check_entry(section, key, value).expect("entry must be accepted");
            doc.set(section, key, value);
        }

        // Act
        let restored = parse(&serialize(&doc)).expect("parse");

        // Assert
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_serialize_writes_headers_entries_and_blank_lines() {
        let mut doc = Document::bootstrap();
        doc.set("first", "count", "0");
        doc.set("first", "empty", "");

        let text = serialize(&doc);

        assert_eq!(
            text,
            "[main]\nreader = configreader\n\n[first]\ncount = 0\nempty = \n\n"
        );
    }

    #[test]
    fn test_serialize_then_parse_restores_document() {
        // Arrange
        let mut doc = Document::bootstrap();
        doc.set("main", "title", "The Place");
        doc.set("net", "url", "http://x:1/");
        doc.set("net", "motd", "line one\nline two");
        doc.set("empty_section_follows", "k", "v");
        doc.section_or_insert("blank");

        // Act
        let restored = parse(&serialize(&doc)).expect("parse");

        // Assert
        assert_eq!(restored, doc);
    }
}
