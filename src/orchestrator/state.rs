use tokio::task::JoinHandle;

use crate::host::EditorSnapshot;

/// Where a document is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Debounce timer armed.
    Pending,
    /// Blame query in flight.
    Querying,
}

/// Observable per-document state, returned by
/// [`OrchestratorHandle::cursor_state`](super::OrchestratorHandle::cursor_state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub phase: Phase,
    /// Last zero-based line a decoration was rendered for.
    pub last_annotated_line: Option<u32>,
    /// Zero-based line of the most recent refresh request.
    pub requested_line: Option<u32>,
}

/// The refresh a document is waiting on. Anything tagged with another token
/// is stale.
#[derive(Debug)]
pub(crate) struct Request {
    pub token: u64,
    pub snapshot: EditorSnapshot,
}

#[derive(Debug, Default)]
pub(crate) struct DocumentState {
    pub last_annotated_line: Option<u32>,
    pub requested_line: Option<u32>,
    pub request: Option<Request>,
    pub timer: Option<JoinHandle<()>>,
    pub phase: Phase,
}

impl DocumentState {
    pub fn is_current(&self, token: u64) -> bool {
        self.request.as_ref().is_some_and(|r| r.token == token)
    }

    /// Abort the debounce timer and forget the outstanding request. A query
    /// already in flight keeps running but its result will be discarded.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.request = None;
        self.phase = Phase::Idle;
    }

    pub fn cursor_state(&self) -> CursorState {
        CursorState {
            phase: self.phase,
            last_annotated_line: self.last_annotated_line,
            requested_line: self.requested_line,
        }
    }
}
