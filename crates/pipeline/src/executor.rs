//! Pipeline executor - runs stages in order against one run record
//!
//! The executor is the sole writer of `RunState` for the duration of a
//! run. Tasks receive cloned snapshots; all mutation happens at the
//! merge barrier after a stage's tasks have returned, in
//! task-declaration order. The shared handle exists only so the run
//! controller can serve poll-based snapshots between stages.

use crate::error::{PipelineError, PipelineResult, TaskError};
use crate::stage::{Stage, StageMode};
use crate::task::{AnalysisTask, TaskResult};
use delphi_core::{RunPhase, RunState};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

/// Outcome of one task slot at the merge barrier.
///
/// `None` means the task was cancelled before it finished and
/// contributes no update.
type SlotResult = Option<TaskResult>;

/// An ordered list of stages, validated at construction
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build a pipeline; rejects an empty stage list
    pub fn new(stages: Vec<Stage>) -> PipelineResult<Self> {
        if stages.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Execute all stages against the shared run record.
    ///
    /// Terminal phase is written into the record: `Completed` when every
    /// stage was attempted (regardless of individual task failures),
    /// `Failed` when a fatal condition (including cancellation) ended
    /// the run early.
    pub async fn execute(
        &self,
        shared: Arc<RwLock<RunState>>,
        mut cancel: watch::Receiver<bool>,
    ) -> PipelineResult<()> {
        for (index, stage) in self.stages.iter().enumerate() {
            if *cancel.borrow() {
                return self.abort_run(&shared, PipelineError::Cancelled).await;
            }

            {
                let mut state = shared.write().await;
                state.phase = RunPhase::Running { stage: index };
            }
            log::info!(
                "stage '{}' starting ({}/{}, {} task(s), {:?})",
                stage.name(),
                index + 1,
                self.stages.len(),
                stage.tasks().len(),
                stage.mode(),
            );

            let outcome = match stage.mode() {
                StageMode::Parallel => self.run_parallel(stage, &shared, &mut cancel).await,
                StageMode::Sequential => self.run_sequential(stage, &shared, &mut cancel).await,
            };

            if let Err(fatal) = outcome {
                return self.abort_run(&shared, fatal).await;
            }
            log::info!("stage '{}' complete", stage.name());
        }

        let mut state = shared.write().await;
        state.phase = RunPhase::Completed;
        log::info!(
            "run {} completed: {} section(s), {} log line(s)",
            state.run_id,
            state.sections.len(),
            state.log.len(),
        );
        Ok(())
    }

    async fn abort_run(
        &self,
        shared: &Arc<RwLock<RunState>>,
        fatal: PipelineError,
    ) -> PipelineResult<()> {
        let mut state = shared.write().await;
        log::warn!("run {} failed: {}", state.run_id, fatal);
        state.fail(fatal.to_string());
        Err(fatal)
    }

    /// Parallel mode: every task runs concurrently against the same
    /// immutable snapshot taken at stage entry. Results are harvested
    /// and merged in declaration order at the barrier.
    async fn run_parallel(
        &self,
        stage: &Stage,
        shared: &Arc<RwLock<RunState>>,
        cancel: &mut watch::Receiver<bool>,
    ) -> PipelineResult<()> {
        let snapshot = Arc::new(shared.read().await.clone());

        let handles: Vec<JoinHandle<TaskResult>> = stage
            .tasks()
            .iter()
            .map(|task| {
                let task = Arc::clone(task);
                let snapshot = Arc::clone(&snapshot);
                tokio::spawn(async move { task.run(&snapshot).await })
            })
            .collect();

        // Barrier: join in declaration order (total wait is still the
        // slowest task). On cancellation, abort whatever has not
        // finished; an abort races a completed task, so joining after
        // abort still harvests finished work.
        let mut slots: Vec<SlotResult> = Vec::with_capacity(handles.len());
        let mut was_cancelled = false;
        for mut handle in handles {
            if was_cancelled {
                handle.abort();
                slots.push(harvest(handle).await);
                continue;
            }
            tokio::select! {
                joined = &mut handle => {
                    slots.push(settle(joined));
                }
                _ = cancelled(cancel) => {
                    was_cancelled = true;
                    handle.abort();
                    slots.push(harvest(handle).await);
                }
            }
        }

        let mut state = shared.write().await;
        for (task, slot) in stage.tasks().iter().zip(slots) {
            merge_slot(&mut state, task.as_ref(), slot);
        }
        drop(state);

        if was_cancelled {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }

    /// Sequential mode: one task at a time in declared order, each
    /// merged before the next starts so intra-stage dependency chains
    /// see their predecessors' sections.
    async fn run_sequential(
        &self,
        stage: &Stage,
        shared: &Arc<RwLock<RunState>>,
        cancel: &mut watch::Receiver<bool>,
    ) -> PipelineResult<()> {
        for task in stage.tasks() {
            if *cancel.borrow() {
                let mut state = shared.write().await;
                merge_slot(&mut state, task.as_ref(), None);
                return Err(PipelineError::Cancelled);
            }

            let snapshot = Arc::new(shared.read().await.clone());
            let spawned = Arc::clone(task);
            let mut handle = tokio::spawn(async move { spawned.run(&snapshot).await });

            let (slot, was_cancelled) = tokio::select! {
                joined = &mut handle => (settle(joined), false),
                _ = cancelled(cancel) => {
                    handle.abort();
                    (harvest(handle).await, true)
                }
            };

            let mut state = shared.write().await;
            merge_slot(&mut state, task.as_ref(), slot);
            drop(state);

            if was_cancelled {
                return Err(PipelineError::Cancelled);
            }
        }
        Ok(())
    }
}

/// Resolves only once a cancellation signal is observed. A dropped
/// sender means cancellation can no longer arrive, so wait forever.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Join an aborted handle: the abort races task completion, so a task
/// that finished first still yields its result.
async fn harvest(handle: JoinHandle<TaskResult>) -> SlotResult {
    match handle.await {
        Ok(result) => Some(result),
        Err(_) => None,
    }
}

/// Convert a join outcome into a barrier slot. A panicking adapter is
/// contained by the spawn boundary and degraded to a task error.
fn settle(joined: Result<TaskResult, tokio::task::JoinError>) -> SlotResult {
    match joined {
        Ok(result) => Some(result),
        Err(err) if err.is_cancelled() => None,
        Err(err) => Some(Err(TaskError::Panicked(err.to_string()))),
    }
}

/// The single mutation point: apply one task's outcome to the record
fn merge_slot(state: &mut RunState, task: &dyn AnalysisTask, slot: SlotResult) {
    match slot {
        Some(Ok(output)) => {
            state.insert_section(task.section(), output.value);
            for line in output.log {
                state.push_log(line);
            }
        }
        Some(Err(err)) => {
            log::warn!("task '{}' failed: {}", task.name(), err);
            state.push_log(format!("{}: failed - {}", task.name(), err));
        }
        None => {
            log::warn!("task '{}' cancelled before completion", task.name());
            state.push_log(format!("{}: cancelled before completion", task.name()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskOutput;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTask {
        name: String,
        section: String,
    }

    #[async_trait]
    impl AnalysisTask for EchoTask {
        fn name(&self) -> &str {
            &self.name
        }

        fn section(&self) -> &str {
            &self.section
        }

        async fn run(&self, state: &RunState) -> TaskResult {
            Ok(TaskOutput::new(json!({ "subject": state.subject }))
                .with_log(format!("{}: done", self.name)))
        }
    }

    fn echo(name: &str, section: &str) -> Arc<dyn AnalysisTask> {
        Arc::new(EchoTask {
            name: name.to_string(),
            section: section.to_string(),
        })
    }

    fn shared_state(subject: &str) -> Arc<RwLock<RunState>> {
        Arc::new(RwLock::new(RunState::new(subject)))
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        assert_eq!(Pipeline::new(vec![]).err(), Some(PipelineError::EmptyPipeline));
    }

    #[tokio::test]
    async fn test_single_stage_merges_sections() {
        let pipeline = Pipeline::new(vec![
            Stage::parallel("only", vec![echo("a", "alpha"), echo("b", "beta")]).unwrap(),
        ])
        .unwrap();

        let shared = shared_state("TCS");
        let (_tx, rx) = watch::channel(false);
        pipeline.execute(Arc::clone(&shared), rx).await.unwrap();

        let state = shared.read().await;
        assert_eq!(state.phase, RunPhase::Completed);
        assert!(state.section("alpha").is_some());
        assert!(state.section("beta").is_some());
        assert_eq!(state.log, vec!["a: done", "b: done"]);
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_fails_before_stages() {
        let pipeline =
            Pipeline::new(vec![Stage::sequential("s", vec![echo("a", "alpha")]).unwrap()])
                .unwrap();

        let shared = shared_state("TCS");
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = pipeline.execute(Arc::clone(&shared), rx).await;
        assert_eq!(result.err(), Some(PipelineError::Cancelled));

        let state = shared.read().await;
        assert_eq!(state.phase, RunPhase::Failed);
        assert!(state.run_error.as_deref().unwrap().contains("cancelled"));
        assert!(state.sections.is_empty());
    }
}
