use thiserror::Error;

/// Domain-level errors for core types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Empty price series")]
    EmptySeries,

    #[error("Unknown interval: {0}")]
    UnknownInterval(String),

    #[error("Invalid subject symbol: {0}")]
    InvalidSubject(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
