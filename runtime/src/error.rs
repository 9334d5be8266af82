//! Host-level errors of the runtime.

use std::fmt;
use std::io;
use std::path::PathBuf;

use iris::ErrorValue;
use thiserror::Error;

/// Pipeline step a script error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Resolve,
    Eval,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "reader",
            Stage::Resolve => "resolving",
            Stage::Eval => "evaluation",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{stage} error: {}", .error.repr())]
    Script { stage: Stage, error: ErrorValue },

    #[error("failed to spawn interpreter thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("interpreter thread panicked")]
    WorkerPanicked,
}

impl RunError {
    pub fn script(stage: Stage, error: ErrorValue) -> Self {
        RunError::Script { stage, error }
    }

    /// The script error value, if this is one.
    pub fn error_value(&self) -> Option<&ErrorValue> {
        match self {
            RunError::Script { error, .. } => Some(error),
            _ => None,
        }
    }
}
