use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decoration::DecorationStyle;
use crate::error::BlameError;
use crate::format::DEFAULT_DATE_FORMAT;

/// Delay between the last cursor move and the blame query.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Settings for the inline blame pipeline, read from the extension's
/// settings JSON. Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlameConfig {
    pub debounce_ms: u64,
    /// Program used for both the repository probe and `blame`.
    pub git_path: String,
    pub style: DecorationStyle,
    /// strftime pattern for the hover date.
    pub hover_date_format: String,
}

impl Default for BlameConfig {
    fn default() -> Self {
        BlameConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            git_path: "git".to_string(),
            style: DecorationStyle::default(),
            hover_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl BlameConfig {
    pub fn from_json(json: &str) -> Result<Self, BlameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
