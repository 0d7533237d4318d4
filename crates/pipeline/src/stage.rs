//! Stage - a named group of tasks plus an execution mode
//!
//! Construction validates the task set: a stage must be non-empty and
//! no two tasks may declare the same output section. Both violations
//! are programming errors and fail before anything executes.

use crate::error::PipelineError;
use crate::task::AnalysisTask;
use std::collections::HashSet;
use std::sync::Arc;

/// How a stage executes its tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMode {
    /// All tasks run concurrently against the same immutable snapshot
    /// taken at stage entry
    Parallel,
    /// Tasks run one at a time in declared order; each sees the state
    /// as merged after all previous tasks in this stage
    Sequential,
}

/// A named group of tasks executed together
pub struct Stage {
    name: String,
    mode: StageMode,
    tasks: Vec<Arc<dyn AnalysisTask>>,
}

impl Stage {
    /// Create a parallel stage; fails on an empty or colliding task set
    pub fn parallel(
        name: &str,
        tasks: Vec<Arc<dyn AnalysisTask>>,
    ) -> Result<Self, PipelineError> {
        Self::validated(name, StageMode::Parallel, tasks)
    }

    /// Create a sequential stage; fails on an empty or colliding task set
    pub fn sequential(
        name: &str,
        tasks: Vec<Arc<dyn AnalysisTask>>,
    ) -> Result<Self, PipelineError> {
        Self::validated(name, StageMode::Sequential, tasks)
    }

    fn validated(
        name: &str,
        mode: StageMode,
        tasks: Vec<Arc<dyn AnalysisTask>>,
    ) -> Result<Self, PipelineError> {
        if tasks.is_empty() {
            return Err(PipelineError::EmptyStage(name.to_string()));
        }

        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.section().to_string()) {
                return Err(PipelineError::DuplicateSection {
                    stage: name.to_string(),
                    section: task.section().to_string(),
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            mode,
            tasks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> StageMode {
        self.mode
    }

    pub fn tasks(&self) -> &[Arc<dyn AnalysisTask>] {
        &self.tasks
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskOutput, TaskResult};
    use async_trait::async_trait;
    use delphi_core::RunState;
    use serde_json::json;

    struct FixedTask {
        name: String,
        section: String,
    }

    #[async_trait]
    impl AnalysisTask for FixedTask {
        fn name(&self) -> &str {
            &self.name
        }

        fn section(&self) -> &str {
            &self.section
        }

        async fn run(&self, _state: &RunState) -> TaskResult {
            Ok(TaskOutput::new(json!({})))
        }
    }

    fn task(name: &str, section: &str) -> Arc<dyn AnalysisTask> {
        Arc::new(FixedTask {
            name: name.to_string(),
            section: section.to_string(),
        })
    }

    #[test]
    fn test_duplicate_sections_rejected_at_construction() {
        let result = Stage::parallel(
            "analysts",
            vec![task("a", "technical"), task("b", "technical")],
        );
        assert_eq!(
            result.err(),
            Some(PipelineError::DuplicateSection {
                stage: "analysts".to_string(),
                section: "technical".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_stage_rejected() {
        let result = Stage::sequential("empty", vec![]);
        assert_eq!(result.err(), Some(PipelineError::EmptyStage("empty".to_string())));
    }

    #[test]
    fn test_distinct_sections_accepted() {
        let stage = Stage::parallel(
            "analysts",
            vec![task("a", "technical"), task("b", "sentiment")],
        )
        .unwrap();
        assert_eq!(stage.name(), "analysts");
        assert_eq!(stage.mode(), StageMode::Parallel);
        assert_eq!(stage.tasks().len(), 2);
    }
}
