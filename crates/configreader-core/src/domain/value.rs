//! Read-time value coercion.
//!
//! Every value in a document is stored as text.  When a caller reads a value
//! back, [`coerce`] applies an ordered list of rules to turn the text into the
//! type the caller most likely meant:
//!
//! | Raw text                     | Result                  |
//! |------------------------------|-------------------------|
//! | `None`                       | [`Value::Null`]         |
//! | `True` / `False`             | [`Value::Bool`]         |
//! | `42`, `-7`, `+3`             | [`Value::Int`]          |
//! | anything else (including "") | [`Value::Str`] verbatim |
//!
//! Matching is case-sensitive: `none`, `true` and `TRUE` stay strings.
//! Floating-point literals such as `1.5` are not coerced.  New rules go into
//! the `RULES` table; the first rule that accepts the text wins.

use std::fmt;

use serde::{Serialize, Serializer};

/// Text stored for an absent value, and coerced back to [`Value::Null`].
pub const NONE_MARKER: &str = "None";

/// A coerced configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// The absent value (stored as `"None"`).
    #[default]
    Null,
    Bool(bool),
    /// A signed decimal integer that fits in 64 bits.
    Int(i64),
    Str(String),
}

/// A single coercion rule: returns `Some` when it recognises the raw text.
type Rule = fn(&str) -> Option<Value>;

/// Coercion rules, applied in order.
const RULES: &[Rule] = &[coerce_none, coerce_bool, coerce_int];

/// Converts raw stored text into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use configreader_core::{coerce, Value};
///
/// assert_eq!(coerce("True"), Value::Bool(true));
/// assert_eq!(coerce("0"), Value::Int(0));
/// assert_eq!(coerce("None"), Value::Null);
/// assert_eq!(coerce(""), Value::Str(String::new()));
/// ```
pub fn coerce(raw: &str) -> Value {
    RULES
        .iter()
        .find_map(|rule| rule(raw))
        .unwrap_or_else(|| Value::Str(raw.to_string()))
}

fn coerce_none(raw: &str) -> Option<Value> {
    (raw == NONE_MARKER).then_some(Value::Null)
}

fn coerce_bool(raw: &str) -> Option<Value> {
    match raw {
        "True" => Some(Value::Bool(true)),
        "False" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn coerce_int(raw: &str) -> Option<Value> {
    let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Out-of-range integers fall through and stay strings.
    raw.parse::<i64>().ok().map(Value::Int)
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string payload of a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The text this value is stored as.
    ///
    /// This is the inverse of [`coerce`] for every value except strings that
    /// happen to look like another type (`Value::Str("True")` is stored as
    /// `True` and reads back as a boolean).
    pub fn to_stored(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(NONE_MARKER),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
