use thiserror::Error;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Expected, recoverable outcomes of workflow operations. The API layer maps
/// each variant to a status code and user-facing message; only `Store`
/// represents an infrastructure failure and surfaces generically.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("end date cannot be before start date")]
    InvalidRange,
    #[error("insufficient leave balance for this request")]
    InsufficientBalance,
    #[error("you are not allowed to perform this action")]
    Forbidden,
    #[error("request is not in a state that permits this action")]
    InvalidTransition,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}
