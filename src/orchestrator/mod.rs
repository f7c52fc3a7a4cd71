pub mod pipeline;
pub mod state;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::blame::LineAttribution;
use crate::config::BlameConfig;
use crate::decoration::DecorationRenderer;
use crate::error::BlameError;
use crate::git::{GitRunner, ProcessRunner};
use crate::host::{DocumentId, EditorEvent, EditorHost, EditorSnapshot};

pub use pipeline::Pipeline;
pub use state::{CursorState, Phase};

use state::{DocumentState, Request};

enum Msg {
    Event(EditorEvent),
    DebounceFired {
        document: DocumentId,
        token: u64,
    },
    Refreshed {
        document: DocumentId,
        token: u64,
        outcome: Result<LineAttribution, BlameError>,
    },
    Inspect {
        document: DocumentId,
        reply: oneshot::Sender<Option<CursorState>>,
    },
    Shutdown,
}

/// Owner of the refresh state machine. Created with [`Orchestrator::spawn`].
///
/// One task owns all per-document state and handles messages one at a time:
/// editor events from the host, debounce timer fires, and finished queries.
/// Timers and queries run as separate tasks and report back through the same
/// channel, so a slow `git blame` never holds up other events. Each refresh is
/// tagged with a token; anything carrying a token the document no longer
/// waits on is dropped.
pub struct Orchestrator {
    host: Arc<dyn EditorHost>,
    pipeline: Arc<Pipeline>,
    renderer: DecorationRenderer,
    debounce: Duration,
    documents: HashMap<DocumentId, DocumentState>,
    next_token: u64,
    tx: mpsc::WeakUnboundedSender<Msg>,
}

impl Orchestrator {
    /// Start the orchestrator on the current tokio runtime, running git as
    /// `config.git_path`.
    pub fn spawn(host: Arc<dyn EditorHost>, config: &BlameConfig) -> OrchestratorHandle {
        let runner = Arc::new(ProcessRunner::new(config.git_path.clone()));
        Orchestrator::spawn_with_runner(host, runner, config)
    }

    /// Start the orchestrator with a custom [`GitRunner`].
    ///
    /// Registers the decoration kind and refreshes the active editor, if any,
    /// right away.
    pub fn spawn_with_runner(
        host: Arc<dyn EditorHost>,
        runner: Arc<dyn GitRunner>,
        config: &BlameConfig,
    ) -> OrchestratorHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let renderer = DecorationRenderer::new(host.as_ref(), config);

        if let Some(active) = host.active_editor() {
            let _ = tx.send(Msg::Event(EditorEvent::ActiveEditorChanged(Some(active))));
        }

        let orchestrator = Orchestrator {
            host,
            pipeline: Arc::new(Pipeline::new(runner)),
            renderer,
            debounce: config.debounce(),
            documents: HashMap::new(),
            next_token: 0,
            tx: tx.downgrade(),
        };
        let task = tokio::spawn(orchestrator.run(rx));

        OrchestratorHandle { tx, task }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Msg>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                Msg::Event(event) => self.on_event(event),
                Msg::DebounceFired { document, token } => self.on_debounce_fired(document, token),
                Msg::Refreshed {
                    document,
                    token,
                    outcome,
                } => self.on_refreshed(document, token, outcome),
                Msg::Inspect { document, reply } => {
                    let _ = reply.send(self.documents.get(&document).map(DocumentState::cursor_state));
                }
                Msg::Shutdown => break,
            }
        }

        for state in self.documents.values_mut() {
            state.cancel();
        }
        tracing::debug!("blame orchestrator stopped");
    }

    fn issue_token(&mut self) -> u64 {
        self.next_token = self.next_token.wrapping_add(1);
        self.next_token
    }

    fn on_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::SelectionChanged(snapshot) => self.on_selection_changed(snapshot),
            EditorEvent::ActiveEditorChanged(Some(snapshot)) => self.refresh_now(snapshot),
            EditorEvent::ActiveEditorChanged(None) => {
                tracing::trace!("no active editor");
            }
            EditorEvent::DocumentClosed(document) => {
                if let Some(mut state) = self.documents.remove(&document) {
                    state.cancel();
                }
            }
        }
    }

    fn on_selection_changed(&mut self, snapshot: EditorSnapshot) {
        let token = self.issue_token();
        let line = snapshot.cursor_line;
        let document = snapshot.document.clone();
        let state = self.documents.entry(document.clone()).or_default();

        if state.requested_line == Some(line) {
            // Same line. Unsaved edits may have made its attribution stale.
            if snapshot.is_dirty {
                state.cancel();
                self.renderer.clear(self.host.as_ref(), &document);
            } else {
                tracing::trace!(document = %document, line, "cursor stayed on line");
            }
            return;
        }

        state.cancel();
        self.renderer.clear(self.host.as_ref(), &document);

        tracing::debug!(document = %document, line, token, "arming blame debounce");
        state.requested_line = Some(line);
        state.timer = arm_debounce(&self.tx, document, token, self.debounce);
        state.request = Some(Request { token, snapshot });
        state.phase = Phase::Pending;
    }

    /// Focus moved to `snapshot`'s editor: query without waiting.
    fn refresh_now(&mut self, snapshot: EditorSnapshot) {
        let token = self.issue_token();
        let state = self.documents.entry(snapshot.document.clone()).or_default();

        state.cancel();
        state.requested_line = Some(snapshot.cursor_line);
        state.request = Some(Request {
            token,
            snapshot: snapshot.clone(),
        });
        state.phase = Phase::Querying;

        self.launch(token, snapshot);
    }

    fn on_debounce_fired(&mut self, document: DocumentId, token: u64) {
        let Some(state) = self.documents.get_mut(&document) else {
            return;
        };
        if !state.is_current(token) || state.phase != Phase::Pending {
            tracing::trace!(document = %document, token, "stale debounce fire");
            return;
        }
        let Some(snapshot) = state.request.as_ref().map(|r| r.snapshot.clone()) else {
            return;
        };

        state.timer = None;
        state.phase = Phase::Querying;
        self.launch(token, snapshot);
    }

    fn launch(&self, token: u64, snapshot: EditorSnapshot) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let pipeline = Arc::clone(&self.pipeline);

        tracing::debug!(document = %snapshot.document, line = snapshot.cursor_line, token, "querying blame");
        tokio::spawn(async move {
            let outcome = pipeline.attribute(&snapshot).await;
            let _ = tx.send(Msg::Refreshed {
                document: snapshot.document,
                token,
                outcome,
            });
        });
    }

    /// The one place failures end: every error becomes "no decoration".
    fn on_refreshed(
        &mut self,
        document: DocumentId,
        token: u64,
        outcome: Result<LineAttribution, BlameError>,
    ) {
        let Some(state) = self.documents.get_mut(&document) else {
            return;
        };
        if !state.is_current(token) {
            tracing::debug!(document = %document, token, "discarding superseded blame result");
            return;
        }
        let Some(request) = state.request.take() else {
            return;
        };
        state.phase = Phase::Idle;

        let line = request.snapshot.cursor_line;
        match outcome {
            Ok(attribution) => {
                let line_length = self
                    .host
                    .line_length(&document, line)
                    .unwrap_or(request.snapshot.line_length);
                self.renderer.render(
                    self.host.as_ref(),
                    &document,
                    line,
                    line_length,
                    Some(&attribution),
                );
                state.last_annotated_line = Some(line);
            }
            Err(e) => {
                tracing::debug!(document = %document, line, kind = ?e.kind(), error = %e, "no blame for line");
                self.renderer.clear(self.host.as_ref(), &document);
            }
        }
    }
}

fn arm_debounce(
    tx: &mpsc::WeakUnboundedSender<Msg>,
    document: DocumentId,
    token: u64,
    delay: Duration,
) -> Option<JoinHandle<()>> {
    let tx = tx.upgrade()?;
    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(Msg::DebounceFired { document, token });
    }))
}

/// Host-side handle to a running [`Orchestrator`].
///
/// Dropping the handle stops the orchestrator once in-flight work drains.
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<Msg>,
    task: JoinHandle<()>,
}

impl OrchestratorHandle {
    /// Forward an editor event. Events are handled in the order they are sent.
    pub fn notify(&self, event: EditorEvent) -> Result<(), BlameError> {
        self.tx
            .send(Msg::Event(event))
            .map_err(|_| BlameError::Closed)
    }

    /// Current state for `document`, or `None` if the orchestrator has not
    /// seen it.
    pub async fn cursor_state(&self, document: &DocumentId) -> Result<Option<CursorState>, BlameError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Msg::Inspect {
                document: document.clone(),
                reply,
            })
            .map_err(|_| BlameError::Closed)?;
        rx.await.map_err(|_| BlameError::Closed)
    }

    /// Stop handling events and cancel pending debounce timers.
    pub async fn shutdown(self) {
        let _ = self.tx.send(Msg::Shutdown);
        let _ = self.task.await;
    }
}
