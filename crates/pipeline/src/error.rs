use thiserror::Error;

/// Non-fatal failure of a single analysis task.
///
/// Recovered locally by the executor: one log line, section left
/// absent, the pipeline continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("collaborator failure: {0}")]
    Collaborator(String),

    #[error("missing input section '{0}'")]
    MissingInput(String),

    #[error("unusable data: {0}")]
    UnusableData(String),

    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Fatal pipeline condition.
///
/// Construction variants fire before anything executes; the runtime
/// variants abort the run and set `run_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("stage '{stage}' declares duplicate output section '{section}'")]
    DuplicateSection { stage: String, section: String },

    #[error("stage '{0}' has no tasks")]
    EmptyStage(String),

    #[error("pipeline has no stages")]
    EmptyPipeline,

    #[error("run cancelled")]
    Cancelled,
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
