//! Export adapters: JSON text and process environment variables.
//!
//! Both adapters read raw stored strings, not coerced values, so `"0"` is
//! exported as the string `"0"` and `"None"` as `"None"`.

use std::io::Write;

use configreader_core::Document;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::infrastructure::environment::{variable_name, EnvironmentSink};

/// Renders `doc` as a JSON object of sections, each an object of raw values,
/// in store order.  The text is also written to `sink` when one is given.
///
/// # Errors
///
/// Returns [`ConfigError::Json`] if serialization fails and
/// [`ConfigError::Io`] if writing to the sink fails.
pub fn to_json(doc: &Document, sink: Option<&mut dyn Write>) -> Result<String, ConfigError> {
    let text = serde_json::to_string(doc)?;
    if let Some(sink) = sink {
        sink.write_all(text.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(|source| ConfigError::io("<json sink>", source))?;
        debug!(bytes = text.len(), "wrote JSON export to sink");
    }
    Ok(text)
}

/// Every `(SECTION_KEY, raw value)` pair an env export would set, in store order.
pub fn env_pairs(doc: &Document) -> Vec<(String, String)> {
    doc.iter()
        .map(|(section, key, value)| (variable_name(section, key), value.to_string()))
        .collect()
}

/// Sets every pair from [`env_pairs`] on `sink`.  Returns how many the sink
/// accepted; pairs it skips are not counted.
pub fn to_env(doc: &Document, sink: &mut dyn EnvironmentSink) -> usize {
    let pairs = env_pairs(doc);
    let set = pairs
        .iter()
        .filter(|(name, value)| sink.set_var(name, value))
        .count();
    info!(
        count = set,
        skipped = pairs.len() - set,
        "exported configuration to environment"
    );
    set
}

// ── Tests ─────────────────────────────────────────────────────────────────────
