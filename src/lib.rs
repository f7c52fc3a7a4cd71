pub mod blame;
pub mod config;
pub mod decoration;
pub mod error;
pub mod format;
pub mod host;

#[cfg(not(target_arch = "wasm32"))]
pub mod git;
#[cfg(not(target_arch = "wasm32"))]
pub mod orchestrator;

#[cfg(test)]
mod test_support;

use wasm_bindgen::prelude::*;

pub use blame::{parse_line_attribution, LineAttribution};
pub use config::BlameConfig;
pub use decoration::{Decoration, DecorationKind, DecorationRange, DecorationStyle};
pub use error::{BlameError, FailureKind};
pub use host::{DocumentId, EditorEvent, EditorHost, EditorSnapshot};

#[cfg(not(target_arch = "wasm32"))]
pub use git::{GitRunner, ProcessRunner};
#[cfg(not(target_arch = "wasm32"))]
pub use orchestrator::{Orchestrator, OrchestratorHandle};

// ---------------------------------------------------------------------------
// JSON result wrappers for the extension host.
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TextResult {
    content_text: String,
    hover: Option<String>,
}

#[derive(serde::Serialize)]
struct ErrorResult {
    error: String,
}

fn json_error(msg: &str) -> String {
    serde_json::to_string(&ErrorResult {
        error: msg.to_string(),
    })
    .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", msg))
}

// ---------------------------------------------------------------------------
// WASM-exported functions
// ---------------------------------------------------------------------------

/// Parse raw `git blame -L n,n --porcelain` output for one line.
///
/// Returns: JSON LineAttribution, or `null` when the output has no
/// author-time record.
#[wasm_bindgen]
pub fn parse_line_blame(raw_blame: &[u8]) -> String {
    let attribution = blame::parse_line_attribution(raw_blame);
    serde_json::to_string(&attribution)
        .unwrap_or_else(|e| json_error(&format!("Serialization error: {}", e)))
}

/// Format `timestamp` relative to `now`, both unix seconds.
#[wasm_bindgen]
pub fn relative_time(timestamp: i64, now: i64) -> String {
    format::relative_time(timestamp, now)
}

/// Parse raw porcelain output and compose the annotation text and hover.
///
/// `hover_date_format` is a strftime pattern; pass an empty string for the
/// default.
/// Returns: JSON `{ contentText, hover }`, or `null` when the line has no
/// usable attribution.
#[wasm_bindgen]
pub fn decoration_text(raw_blame: &[u8], now: i64, hover_date_format: &str) -> String {
    let pattern = if hover_date_format.is_empty() {
        format::DEFAULT_DATE_FORMAT
    } else {
        hover_date_format
    };

    let result = blame::parse_line_attribution(raw_blame).map(|attribution| {
        let decoration = decoration::build_decoration(0, 0, &attribution, now, pattern);
        TextResult {
            content_text: decoration.content_text,
            hover: decoration.hover,
        }
    });

    serde_json::to_string(&result)
        .unwrap_or_else(|e| json_error(&format!("Serialization error: {}", e)))
}

/// Resolve extension settings against the defaults.
///
/// Input: settings JSON (possibly partial, or empty for all defaults).
/// Returns: the complete BlameConfig as JSON.
#[wasm_bindgen]
pub fn resolve_config(settings_json: &str) -> String {
    let config = if settings_json.trim().is_empty() {
        Ok(BlameConfig::default())
    } else {
        BlameConfig::from_json(settings_json)
    };

    match config {
        Ok(config) => serde_json::to_string(&config)
            .unwrap_or_else(|e| json_error(&format!("Serialization error: {}", e))),
        Err(e) => json_error(&e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
