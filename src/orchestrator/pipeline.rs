use std::sync::Arc;

use crate::blame::{parse_line_attribution, LineAttribution};
use crate::error::BlameError;
use crate::git::{AttributionQuery, GitRunner, RepositoryDetector};
use crate::host::EditorSnapshot;

/// Everything between "the cursor is on this line" and "here is who wrote it".
pub struct Pipeline {
    detector: RepositoryDetector,
    query: AttributionQuery,
}

impl Pipeline {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        Pipeline {
            detector: RepositoryDetector::new(Arc::clone(&runner)),
            query: AttributionQuery::new(runner),
        }
    }

    #[cfg(test)]
    pub(crate) fn detector(&self) -> &RepositoryDetector {
        &self.detector
    }

    /// Attribution for the snapshot's cursor line.
    pub async fn attribute(&self, snapshot: &EditorSnapshot) -> Result<LineAttribution, BlameError> {
        let root = snapshot
            .workspace_root
            .as_deref()
            .ok_or_else(|| BlameError::NoWorkspace(snapshot.file_path.clone()))?;

        if !self.detector.is_under_version_control(root).await {
            return Err(BlameError::NotARepository(root.to_path_buf()));
        }

        let relative = snapshot
            .file_path
            .strip_prefix(root)
            .map_err(|_| BlameError::OutsideRoot {
                path: snapshot.file_path.clone(),
                root: root.to_path_buf(),
            })?;

        let raw = self
            .query
            .query_line_attribution(root, relative, snapshot.cursor_line.saturating_add(1))
            .await?;

        parse_line_attribution(&raw).ok_or(BlameError::Unparseable)
    }
}
