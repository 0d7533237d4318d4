//! Task contract - the uniform interface wrapping one analysis collaborator
//!
//! A task reads a snapshot of the run record and produces one section
//! document plus its own log lines. The output section name is declared
//! statically so the stage constructor can detect collisions before
//! anything runs.
//!
//! Adapters own their failure handling: a collaborator error (remote
//! call, bad data) must come back as a `TaskError`, never a panic.
//! Whether to substitute a default document instead of failing is the
//! adapter's decision, not the executor's.

use crate::error::TaskError;
use async_trait::async_trait;
use delphi_core::RunState;
use serde_json::Value;

/// Partial update produced by one successful task
#[derive(Debug, Clone)]
pub struct TaskOutput {
    /// Document to store under the task's declared section
    pub value: Value,
    /// Log lines, appended to the run log in task-declaration order
    pub log: Vec<String>,
}

impl TaskOutput {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            log: Vec::new(),
        }
    }

    /// Builder-style log line
    pub fn with_log(mut self, line: impl Into<String>) -> Self {
        self.log.push(line.into());
        self
    }
}

pub type TaskResult = std::result::Result<TaskOutput, TaskError>;

/// One analysis task behind the uniform pipeline contract
#[async_trait]
pub trait AnalysisTask: Send + Sync {
    /// Human-readable task name, used in log lines
    fn name(&self) -> &str;

    /// Output section this task owns; declared before execution so the
    /// stage constructor can reject duplicates
    fn section(&self) -> &str;

    /// Run against a read snapshot of the run record.
    ///
    /// Parallel stages hand every task the same immutable snapshot
    /// taken at stage entry; sequential stages hand each task the state
    /// as merged after its predecessors.
    async fn run(&self, state: &RunState) -> TaskResult;
}
