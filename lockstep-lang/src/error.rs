use thiserror::Error;

/// Recoverable failures surfaced from `tick`.
///
/// Contract violations — reading a context variable that was never
/// written — are construction-time bugs in the statement tree and panic
/// instead of producing one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested activity name was not found in the module or any of
    /// its imports.
    #[error("activity not found: {0}")]
    ActivityNotFound(String),

    /// An `exit` statement was reached inside a cobegin trail, which
    /// would break the scheduler's join semantics.
    #[error("exit/return not allowed in a trail")]
    ExitNotAllowed,
}

pub type EngineResult<T> = Result<T, EngineError>;
