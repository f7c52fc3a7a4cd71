use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use crate::error::BlameError;

use super::runner::GitRunner;

/// Runs `git blame` for single lines.
pub struct AttributionQuery {
    runner: Arc<dyn GitRunner>,
}

impl AttributionQuery {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        AttributionQuery { runner }
    }

    /// Raw porcelain blame for one-based `line` of `relative_path`, run in `root`.
    pub async fn query_line_attribution(
        &self,
        root: &Path,
        relative_path: &Path,
        line: u32,
    ) -> Result<Vec<u8>, BlameError> {
        if line == 0 {
            return Err(BlameError::InvalidLine);
        }
        let args = blame_args(relative_path, line);
        self.runner.run(root, &args).await
    }
}

fn blame_args(relative_path: &Path, line: u32) -> Vec<OsString> {
    vec![
        OsString::from("blame"),
        OsString::from("-L"),
        OsString::from(format!("{},{}", line, line)),
        OsString::from("--porcelain"),
        OsString::from("--"),
        relative_path.as_os_str().to_os_string(),
    ]
}
