//! Fulfillment engine configuration
//!
//! All fields are optional in the JSON form; missing fields take the
//! defaults below.

use serde::{Deserialize, Serialize};

pub use crate::datatype::RegexMode;

/// Engine configuration, immutable once a validator is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum `items`/`fields` nesting of a datatype, unlimited when unset.
    ///
    /// Recursion follows the datatype, never the value, so this bounds how
    /// deeply nested a datatype may be.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// How `regex` constraints match (default "prefix")
    #[serde(default)]
    pub regex_mode: RegexMode,

    /// Log every rejected fulfillment at INFO (default false)
    #[serde(default)]
    pub log_rejections: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            regex_mode: RegexMode::default(),
            log_rejections: false,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_regex_mode(mut self, regex_mode: RegexMode) -> Self {
        self.regex_mode = regex_mode;
        self
    }

    pub fn with_log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }
}
