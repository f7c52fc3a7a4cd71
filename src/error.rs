use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a line from being annotated.
///
/// None of these reach the user: the orchestrator turns every one of them
/// into "no decoration" for the line.
#[derive(Debug, Error)]
pub enum BlameError {
    #[error("no workspace folder contains {0}")]
    NoWorkspace(PathBuf),

    #[error("{0} is not under version control")]
    NotARepository(PathBuf),

    #[error("{path} is outside repository root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("blame line numbers start at 1")]
    InvalidLine,

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("blame output has no author-time record")]
    Unparseable,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("blame orchestrator has shut down")]
    Closed,
}

/// Coarse classification of a [`BlameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotARepository,
    QueryFailure,
    UnparseableAttribution,
    Internal,
}

impl BlameError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BlameError::NoWorkspace(_) | BlameError::NotARepository(_) => {
                FailureKind::NotARepository
            }
            BlameError::OutsideRoot { .. }
            | BlameError::InvalidLine
            | BlameError::Spawn { .. }
            | BlameError::CommandFailed { .. } => FailureKind::QueryFailure,
            BlameError::Unparseable => FailureKind::UnparseableAttribution,
            BlameError::Config(_) | BlameError::Closed => FailureKind::Internal,
        }
    }
}
