//! Recording environment sink for unit testing.
//!
//! Captures exported variables in order so tests can assert on them without
//! touching the process environment.

use super::EnvironmentSink;

/// An [`EnvironmentSink`] that stores every call.
#[derive(Debug, Default, Clone)]
pub struct RecordingEnvironment {
    vars: Vec<(String, String)>,
}

impl RecordingEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All `(name, value)` pairs in the order they were set.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }
}

impl EnvironmentSink for RecordingEnvironment {
    fn set_var(&mut self, name: &str, value: &str) -> bool {
        self.vars.push((name.to_string(), value.to_string()));
        true
    }
}
