//! Severity translation with caller overrides

use std::collections::HashMap;

use flare_core::{Level, SeverityCode};

/// Maps engine severity codes to event levels
///
/// A caller-registered override map always wins over the built-in
/// classification table; codes found in neither fall back to `error`.
#[derive(Debug, Clone, Default)]
pub struct SeverityTranslator {
    overrides: Option<HashMap<SeverityCode, Level>>,
}

impl SeverityTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the override map wholesale; previous overrides are discarded
    pub fn register_severity_map(&mut self, map: HashMap<SeverityCode, Level>) {
        self.overrides = Some(map);
    }

    pub fn translate(&self, code: SeverityCode) -> Level {
        if let Some(overrides) = &self.overrides {
            if let Some(level) = overrides.get(&code) {
                return *level;
            }
        }
        code.classify()
    }
}
