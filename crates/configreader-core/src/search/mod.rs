//! Exact and fuzzy search over every stored value.
//!
//! [`search`] scans the `(section, key, value)` triples of a [`Document`] in
//! store order and reports the entry whose *value* best matches a query.
//!
//! - **Exact mode** returns the first value equal to the query.
//! - **Fuzzy mode** scores every value with [`similarity::ratio`] and returns
//!   the highest-scoring one at or above the threshold.  Ties go to the entry
//!   encountered first.
//!
//! With `case_sensitive = false` both the query and each value are lowercased
//! before comparison; the returned hit always carries the original text.
//!
//! When no value reaches the threshold, fuzzy mode falls back to the
//! bootstrap entry (`reader = configreader` in `main`) if the document still
//! holds it and the query is similar enough to either its key or its value.
//! Exact mode never falls back.

pub mod similarity;

use std::borrow::Cow;

use thiserror::Error;

use crate::domain::document::{Document, BOOTSTRAP_KEY, BOOTSTRAP_VALUE, DEFAULT_SECTION};

/// Similarity cutoff used when the caller does not pick one.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Errors returned by [`search`].
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    /// The threshold lies outside the closed interval `[0, 1]` (or is NaN).
    #[error("search threshold must be within [0, 1], got {0}")]
    Threshold(f64),
}

/// Knobs for [`search`].
///
/// # Examples
///
/// ```rust
/// use configreader_core::SearchOptions;
///
/// let opts = SearchOptions::exact().ignore_case();
/// assert!(opts.exact_match);
/// assert!(!opts.case_sensitive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Require string equality instead of a similarity score.
    pub exact_match: bool,
    /// Compare text as-is (`true`) or lowercased (`false`).
    pub case_sensitive: bool,
    /// Minimum similarity in `[0, 1]` for a fuzzy hit.  Ignored in exact mode
    /// but still validated.
    pub threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            exact_match: false,
            case_sensitive: true,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SearchOptions {
    /// Fuzzy, case-sensitive search at [`DEFAULT_THRESHOLD`].
    pub fn fuzzy() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive search.
    pub fn exact() -> Self {
        Self {
            exact_match: true,
            ..Self::default()
        }
    }

    pub fn ignore_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Checks that the threshold lies within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Threshold`] otherwise.
    pub fn validate(&self) -> Result<(), SearchError> {
        if (0.0..=1.0).contains(&self.threshold) {
            Ok(())
        } else {
            Err(SearchError::Threshold(self.threshold))
        }
    }
}

/// A matched entry.  `value` is the raw stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub key: String,
    pub value: String,
    pub section: String,
}

impl SearchHit {
    fn from_triple((section, key, value): (&str, &str, &str)) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            section: section.to_string(),
        }
    }

    /// Returns `(key, value, section)`.
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (&self.key, &self.value, &self.section)
    }
}

/// Searches `doc` for the value matching `word`.
///
/// Returns `Ok(None)` when nothing matches.
///
/// # Errors
///
/// Returns [`SearchError::Threshold`] before scanning if
/// `opts.threshold` is outside `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// use configreader_core::{search, Document, SearchOptions};
///
/// let doc = Document::bootstrap();
/// let hit = search(&doc, "reader", &SearchOptions::default()).unwrap().unwrap();
/// assert_eq!(hit.as_tuple(), ("reader", "configreader", "main"));
/// ```
pub fn search(
    doc: &Document,
    word: &str,
    opts: &SearchOptions,
) -> Result<Option<SearchHit>, SearchError> {
    opts.validate()?;

    let needle = fold_case(word, opts.case_sensitive);

    if opts.exact_match {
        return Ok(doc
            .iter()
            .find(|(_, _, value)| fold_case(value, opts.case_sensitive) == needle)
            .map(SearchHit::from_triple));
    }

    let mut best: Option<(f64, (&str, &str, &str))> = None;
    for triple in doc.iter() {
        let score = similarity::ratio(&needle, &fold_case(triple.2, opts.case_sensitive));
        if score < opts.threshold {
            continue;
        }
        // Strictly greater keeps the earliest entry on ties.
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, triple));
        }
    }

    if let Some((_, triple)) = best {
        return Ok(Some(SearchHit::from_triple(triple)));
    }
    Ok(bootstrap_fallback(doc, &needle, opts))
}

/// Returns the bootstrap entry if it is still stored and `needle` scores at
/// least the threshold against its key or its value.
fn bootstrap_fallback(doc: &Document, needle: &str, opts: &SearchOptions) -> Option<SearchHit> {
    if doc.get(DEFAULT_SECTION, BOOTSTRAP_KEY) != Some(BOOTSTRAP_VALUE) {
        return None;
    }
    let score = similarity::ratio(needle, &fold_case(BOOTSTRAP_KEY, opts.case_sensitive)).max(
        similarity::ratio(needle, &fold_case(BOOTSTRAP_VALUE, opts.case_sensitive)),
    );
    (score >= opts.threshold)
        .then(|| SearchHit::from_triple((DEFAULT_SECTION, BOOTSTRAP_KEY, BOOTSTRAP_VALUE)))
}

fn fold_case(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
