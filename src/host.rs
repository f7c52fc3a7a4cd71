use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::decoration::{Decoration, DecorationKind, DecorationStyle};

/// Stable identity of an open document, derived from its URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(uri: impl Into<String>) -> Self {
        DocumentId(uri.into())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the pipeline needs to know about an editor at the moment of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub document: DocumentId,
    /// Absolute path of the file on disk.
    pub file_path: PathBuf,
    /// Root of the workspace folder containing the file, if any.
    pub workspace_root: Option<PathBuf>,
    /// Zero-based line of the primary cursor.
    pub cursor_line: u32,
    /// Length in characters of the cursor line.
    pub line_length: u32,
    /// Whether the document has unsaved changes.
    pub is_dirty: bool,
}

/// Events the host forwards to the orchestrator, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    SelectionChanged(EditorSnapshot),
    /// A different editor became active, or none (`None`).
    ActiveEditorChanged(Option<EditorSnapshot>),
    DocumentClosed(DocumentId),
}

/// Capabilities the host editor provides.
///
/// The host owns the real editor API (callback registration, decoration
/// types, workspace folders). It reports events as [`EditorEvent`]s and
/// exposes only what the blame pipeline needs here.
pub trait EditorHost: Send + Sync {
    /// The currently focused editor, if any.
    fn active_editor(&self) -> Option<EditorSnapshot>;

    /// Current length of `line` (zero-based) in `document`, if the document is
    /// still open and the line exists.
    fn line_length(&self, document: &DocumentId, line: u32) -> Option<u32>;

    /// Register a decoration kind. Called once per orchestrator.
    fn create_decoration_kind(&self, style: &DecorationStyle) -> DecorationKind;

    /// Replace every decoration of `kind` on `document`'s editor with
    /// `decorations`. An empty list clears them.
    fn set_decorations(
        &self,
        document: &DocumentId,
        kind: DecorationKind,
        decorations: Vec<Decoration>,
    );
}
