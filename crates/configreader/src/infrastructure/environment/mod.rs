//! Process environment adapter used by the env export.
//!
//! The [`EnvironmentSink`] trait lets tests record exported variables without
//! mutating the real process environment, which is shared by every test thread.
//!
//! # Sub-modules
//!
//! - **`mock`** – [`mock::RecordingEnvironment`], an in-memory sink for tests.

pub mod mock;

use tracing::warn;

/// Receives `NAME=value` pairs from an env export.
///
/// The production implementation is [`ProcessEnvironment`]; tests use
/// [`mock::RecordingEnvironment`].
pub trait EnvironmentSink {
    /// Sets `name` to `value`, overwriting any previous value.  Returns
    /// `false` if the pair was skipped.
    fn set_var(&mut self, name: &str, value: &str) -> bool;
}

/// Writes straight into the current process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentSink for ProcessEnvironment {
    fn set_var(&mut self, name: &str, value: &str) -> bool {
        // std::env::set_var panics on these instead of returning an error.
        if name.is_empty() || name.contains(['=', '\0']) || value.contains('\0') {
            warn!(name, "skipping variable that the platform cannot store");
            return false;
        }
        std::env::set_var(name, value);
        true
    }
}

/// Builds the variable name for `key` in `section`: `SECTION_KEY`, uppercased.
pub fn variable_name(section: &str, key: &str) -> String {
    format!("{}_{}", section.to_uppercase(), key.to_uppercase())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
