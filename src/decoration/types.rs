use serde::{Deserialize, Serialize};

/// Handle returned by the host when a decoration kind is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorationKind(pub u32);

/// Zero-based, character-indexed range on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationRange {
    pub line: u32,
    pub start_character: u32,
    pub end_character: u32,
}

impl DecorationRange {
    /// Zero-width range just past the last character of `line`.
    pub fn end_of_line(line: u32, line_length: u32) -> Self {
        DecorationRange {
            line,
            start_character: line_length,
            end_character: line_length,
        }
    }
}

/// A trailing annotation, rendered after the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub range: DecorationRange,
    pub content_text: String,
    pub hover: Option<String>,
}

/// Appearance of the trailing annotation, handed to the host once when the
/// decoration kind is created. The range never grows as text is typed at
/// its edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationStyle {
    /// CSS margin before the annotation.
    pub margin: String,
    /// CSS color of the annotation text.
    pub color: String,
}

impl Default for DecorationStyle {
    fn default() -> Self {
        DecorationStyle {
            margin: "0 0 0 2em".to_string(),
            color: "rgba(153, 153, 153, 0.6)".to_string(),
        }
    }
}
