// Local rule violations of the test-session flow.

use schoolhub_core::protocol::SessionPhase;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("cannot {action} while the test is in {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: SessionPhase,
    },

    #[error("the test is closed; answers can no longer be changed")]
    Closed,

    #[error("answers are read-only; switch to edit mode first")]
    ReadOnly,

    #[error("unknown question {0}")]
    UnknownQuestion(String),

    #[error("question {0} is answered with a file")]
    FileQuestion(String),

    #[error("question {0} does not take a file")]
    NotFileQuestion(String),

    #[error("question {0} has no submitted answer to edit")]
    NotSubmitted(String),

    #[error("a submitted answer cannot be cleared (question {0})")]
    ClearSubmitted(String),

    #[error("{0} file(s) still need uploading")]
    PendingUploads(usize),
}
