use thiserror::Error;

use crate::session::View;

/// Worddrill's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Worddrill's crate-wide error type.
///
/// Every variant is a recoverable status, not a fault. The engine guarantees that
/// returning an error never leaves a session in a partial state, so UI layers can
/// render `Display` output as a status line unconditionally and carry on.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// A quiz was started (or a score saved) with no learner selected.
    #[error("no learner selected")]
    NoLearnerSelected,

    /// The word set cannot support a 4-choice quiz.
    #[error("fewer than 4 distinct words available (found {found})")]
    TooFewWords { found: usize },

    /// The pool cannot supply 3 distinct distractors for a target word.
    #[error("not enough distractors for '{target}': found {found} other words, need 3")]
    InsufficientPool { target: String, found: usize },

    /// Submit was requested before any choice was selected.
    #[error("no choice selected")]
    NoChoiceSelected,

    /// The current question was already submitted; the answer is frozen.
    #[error("this question was already answered")]
    AlreadySubmitted,

    /// Advance was requested before the current question was submitted.
    #[error("submit an answer first")]
    NotSubmitted,

    /// The operation is not available in the session's current view.
    #[error("not available in the {0} view")]
    WrongView(View),

    /// A nickname was empty after trimming.
    #[error("nickname must not be empty")]
    EmptyNickname,

    /// Join-code generation collided with existing codes on every attempt.
    #[error("join code generation kept colliding; try again")]
    JoinCodeExhausted,

    /// The persistence collaborator reported a failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}
