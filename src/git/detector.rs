use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use super::runner::GitRunner;

/// Answers "is this root under version control?", probing each root once.
///
/// Results, negative ones included, are kept for the life of the detector.
/// Concurrent first calls for the same root share a single probe.
pub struct RepositoryDetector {
    runner: Arc<dyn GitRunner>,
    cache: Mutex<HashMap<PathBuf, Arc<OnceCell<bool>>>>,
}

impl RepositoryDetector {
    pub fn new(runner: Arc<dyn GitRunner>) -> Self {
        RepositoryDetector {
            runner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn is_under_version_control(&self, root: &Path) -> bool {
        let cell = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            let cell = cache.entry(root.to_path_buf()).or_default();
            Arc::clone(cell)
        };

        if let Some(known) = cell.get() {
            tracing::trace!(root = %root.display(), known, "repository cache hit");
            return *known;
        }

        *cell.get_or_init(|| self.probe(root)).await
    }

    /// The cached answer for `root`, if it has been probed.
    pub fn cached(&self, root: &Path) -> Option<bool> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(root).and_then(|cell| cell.get().copied())
    }

    async fn probe(&self, root: &Path) -> bool {
        let args = [OsString::from("rev-parse"), OsString::from("--git-dir")];
        match self.runner.run(root, &args).await {
            Ok(_) => {
                tracing::debug!(root = %root.display(), "root is a git repository");
                true
            }
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "root is not a git repository");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::ProcessRunner;
    use crate::test_support::FakeGit;

    #[tokio::test]
    async fn test_probe_runs_once_per_root() {
        let git = Arc::new(FakeGit::repository(b"".to_vec()));
        let detector = RepositoryDetector::new(git.clone());
        let root = Path::new("/work/repo");

        assert_eq!(detector.cached(root), None);
        for _ in 0..5 {
            assert!(detector.is_under_version_control(root).await);
        }
        assert_eq!(git.probe_count(), 1);
        assert_eq!(detector.cached(root), Some(true));
    }

    #[tokio::test]
    async fn test_negative_result_is_cached() {
        let git = Arc::new(FakeGit::not_a_repository());
        let detector = RepositoryDetector::new(git.clone());
        let root = Path::new("/work/plain");

        assert!(!detector.is_under_version_control(root).await);
        assert!(!detector.is_under_version_control(root).await);
        assert_eq!(git.probe_count(), 1);
        assert_eq!(detector.cached(root), Some(false));
    }

    #[tokio::test]
    async fn test_roots_are_cached_independently() {
        let git = Arc::new(FakeGit::repository(b"".to_vec()));
        let detector = RepositoryDetector::new(git.clone());

        detector.is_under_version_control(Path::new("/a")).await;
        detector.is_under_version_control(Path::new("/b")).await;
        detector.is_under_version_control(Path::new("/a")).await;
        assert_eq!(git.probe_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_share_probe() {
        let git = Arc::new(FakeGit::repository(b"".to_vec()));
        let detector = RepositoryDetector::new(git.clone());
        let root = Path::new("/work/repo");

        let (a, b) = tokio::join!(
            detector.is_under_version_control(root),
            detector.is_under_version_control(root)
        );
        assert!(a && b);
        assert_eq!(git.probe_count(), 1);
    }

    #[tokio::test]
    async fn test_real_probe_failure_means_false() {
        // Either git is missing or the directory is not a repository; both are "false".
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(ProcessRunner::new("definitely-not-a-real-git-binary-7f3a"));
        let detector = RepositoryDetector::new(runner);
        assert!(!detector.is_under_version_control(dir.path()).await);
    }
}
