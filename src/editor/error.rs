use super::{CycleKey, EditorPhase};
use crate::error::AdminError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Cannot {action} while the editor is {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: EditorPhase,
    },

    #[error("No cycle {0} in this question")]
    UnknownCycle(CycleKey),

    #[error("Cycle {0} must be saved before its answers can change")]
    CycleNotPersisted(CycleKey),

    #[error("Unknown answer '{0}'")]
    UnknownAnswer(String),

    #[error(transparent)]
    Admin(#[from] AdminError),
}
