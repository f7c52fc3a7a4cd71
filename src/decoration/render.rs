use crate::blame::LineAttribution;
use crate::config::BlameConfig;
use crate::format::{absolute_time, relative_time};
use crate::host::{DocumentId, EditorHost};

use super::types::{Decoration, DecorationKind, DecorationRange};

const SEPARATOR: &str = " \u{2022} ";

/// Compose the annotation text: `<author>[, <relative time>] • <summary>`.
///
/// Uncommitted lines have no time segment. An empty summary drops the
/// separator as well.
pub fn decoration_text(attribution: &LineAttribution, now: i64) -> String {
    let mut text = attribution.author.clone();
    if !attribution.is_uncommitted {
        text.push_str(", ");
        text.push_str(&relative_time(attribution.author_time, now));
    }
    if !attribution.summary.is_empty() {
        text.push_str(SEPARATOR);
        text.push_str(&attribution.summary);
    }
    text
}

/// Build the decoration for `line`, anchored at its end.
///
/// The hover carries the authored date in local time, except for
/// uncommitted lines which get none.
pub fn build_decoration(
    line: u32,
    line_length: u32,
    attribution: &LineAttribution,
    now: i64,
    hover_date_format: &str,
) -> Decoration {
    let hover = if attribution.is_uncommitted {
        None
    } else {
        absolute_time(attribution.author_time, hover_date_format)
    };

    Decoration {
        range: DecorationRange::end_of_line(line, line_length),
        content_text: decoration_text(attribution, now),
        hover,
    }
}

/// Applies blame decorations of a single kind to editors.
///
/// Every call replaces whatever this renderer put on the editor before, so at
/// most one annotation is visible per editor.
pub struct DecorationRenderer {
    kind: DecorationKind,
    hover_date_format: String,
}

impl DecorationRenderer {
    /// Register the decoration kind with the host.
    pub fn new(host: &dyn EditorHost, config: &BlameConfig) -> Self {
        DecorationRenderer {
            kind: host.create_decoration_kind(&config.style),
            hover_date_format: config.hover_date_format.clone(),
        }
    }

    /// Show `attribution` at the end of `line`, or clear the editor if there is
    /// nothing to show.
    pub fn render(
        &self,
        host: &dyn EditorHost,
        document: &DocumentId,
        line: u32,
        line_length: u32,
        attribution: Option<&LineAttribution>,
    ) {
        let now = chrono::Utc::now().timestamp();
        self.render_at(host, document, line, line_length, attribution, now);
    }

    pub(crate) fn render_at(
        &self,
        host: &dyn EditorHost,
        document: &DocumentId,
        line: u32,
        line_length: u32,
        attribution: Option<&LineAttribution>,
        now: i64,
    ) {
        let Some(attribution) = attribution else {
            self.clear(host, document);
            return;
        };
        let decoration =
            build_decoration(line, line_length, attribution, now, &self.hover_date_format);
        host.set_decorations(document, self.kind, vec![decoration]);
    }

    pub fn clear(&self, host: &dyn EditorHost, document: &DocumentId) {
        host.set_decorations(document, self.kind, Vec::new());
    }
}
