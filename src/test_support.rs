use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::decoration::{Decoration, DecorationKind, DecorationStyle};
use crate::host::{DocumentId, EditorHost, EditorSnapshot};

/// Host that records every `set_decorations` call.
#[derive(Default)]
pub(crate) struct RecordingHost {
    active: Mutex<Option<EditorSnapshot>>,
    line_lengths: Mutex<HashMap<(DocumentId, u32), u32>>,
    applied: Mutex<Vec<(DocumentId, DecorationKind, Vec<Decoration>)>>,
    kinds: AtomicU32,
}

impl RecordingHost {
    pub(crate) fn with_active(snapshot: EditorSnapshot) -> Self {
        let host = RecordingHost::default();
        *host.active.lock().unwrap() = Some(snapshot);
        host
    }

    pub(crate) fn set_line_length(&self, document: &DocumentId, line: u32, length: u32) {
        self.line_lengths
            .lock()
            .unwrap()
            .insert((document.clone(), line), length);
    }

    /// Every list applied to `document`, oldest first.
    pub(crate) fn history(&self, document: &DocumentId) -> Vec<Vec<Decoration>> {
        self.applied
            .lock()
            .unwrap()
            .iter()
            .filter(|(doc, _, _)| doc == document)
            .map(|(_, _, list)| list.clone())
            .collect()
    }

    /// What is on `document`'s editor now.
    pub(crate) fn current(&self, document: &DocumentId) -> Vec<Decoration> {
        self.history(document).pop().unwrap_or_default()
    }

    pub(crate) fn kinds_created(&self) -> u32 {
        self.kinds.load(Ordering::SeqCst)
    }
}

impl EditorHost for RecordingHost {
    fn active_editor(&self) -> Option<EditorSnapshot> {
        self.active.lock().unwrap().clone()
    }

    fn line_length(&self, document: &DocumentId, line: u32) -> Option<u32> {
        self.line_lengths
            .lock()
            .unwrap()
            .get(&(document.clone(), line))
            .copied()
    }

    fn create_decoration_kind(&self, _style: &DecorationStyle) -> DecorationKind {
        DecorationKind(self.kinds.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn set_decorations(
        &self,
        document: &DocumentId,
        kind: DecorationKind,
        decorations: Vec<Decoration>,
    ) {
        self.applied
            .lock()
            .unwrap()
            .push((document.clone(), kind, decorations));
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) use fake_git::FakeGit;

#[cfg(not(target_arch = "wasm32"))]
mod fake_git {
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::BlameError;
    use crate::git::GitRunner;

    #[derive(Debug, Clone)]
    pub(crate) struct GitCall {
        pub cwd: PathBuf,
        pub args: Vec<String>,
    }

    impl GitCall {
        /// The one-based line of a `blame -L n,n` call.
        pub(crate) fn blame_line(&self) -> Option<u32> {
            let pos = self.args.iter().position(|a| a == "-L")?;
            let range = self.args.get(pos + 1)?;
            range.split(',').next()?.parse().ok()
        }
    }

    /// Scripted git: answers the repository probe and `blame` from memory.
    pub(crate) struct FakeGit {
        is_repository: bool,
        /// `None` makes every blame fail.
        default_blame: Option<Vec<u8>>,
        per_line: HashMap<u32, Vec<u8>>,
        delays: HashMap<u32, Duration>,
        calls: Mutex<Vec<GitCall>>,
    }

    impl FakeGit {
        pub(crate) fn repository(blame: Vec<u8>) -> Self {
            FakeGit {
                is_repository: true,
                default_blame: Some(blame),
                per_line: HashMap::new(),
                delays: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn not_a_repository() -> Self {
            FakeGit {
                is_repository: false,
                ..FakeGit::repository(Vec::new())
            }
        }

        pub(crate) fn blame_fails() -> Self {
            FakeGit {
                default_blame: None,
                ..FakeGit::repository(Vec::new())
            }
        }

        /// Output for one-based `line`.
        pub(crate) fn with_line(mut self, line: u32, blame: Vec<u8>) -> Self {
            self.per_line.insert(line, blame);
            self
        }

        /// Make blame for one-based `line` take `delay`.
        pub(crate) fn with_delay(mut self, line: u32, delay: Duration) -> Self {
            self.delays.insert(line, delay);
            self
        }

        pub(crate) fn probe_count(&self) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.args.first().map(String::as_str) == Some("rev-parse"))
                .count()
        }

        pub(crate) fn blame_calls(&self) -> Vec<GitCall> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.args.first().map(String::as_str) == Some("blame"))
                .cloned()
                .collect()
        }

        fn failure(stderr: &str) -> BlameError {
            BlameError::CommandFailed {
                program: "git".to_string(),
                status: "exit status: 128".to_string(),
                stderr: stderr.to_string(),
            }
        }
    }

    #[async_trait]
    impl GitRunner for FakeGit {
        async fn run(&self, cwd: &Path, args: &[OsString]) -> Result<Vec<u8>, BlameError> {
            let call = GitCall {
                cwd: cwd.to_path_buf(),
                args: args.iter().map(|a| a.to_string_lossy().into_owned()).collect(),
            };
            let line = call.blame_line();
            let subcommand = call.args.first().cloned().unwrap_or_default();
            self.calls.lock().unwrap().push(call);

            match subcommand.as_str() {
                "rev-parse" if self.is_repository => Ok(b".git\n".to_vec()),
                "rev-parse" => Err(FakeGit::failure("fatal: not a git repository")),
                "blame" => {
                    if let Some(delay) = line.and_then(|l| self.delays.get(&l)) {
                        tokio::time::sleep(*delay).await;
                    }
                    line.and_then(|l| self.per_line.get(&l))
                        .or(self.default_blame.as_ref())
                        .cloned()
                        .ok_or_else(|| FakeGit::failure("fatal: no such path in HEAD"))
                }
                other => Err(FakeGit::failure(&format!("unexpected subcommand {}", other))),
            }
        }
    }
}
