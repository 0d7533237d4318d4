//! Run controller
//!
//! Owns the registry of live and finished runs. `start_run` returns as
//! soon as the executor is spawned; callers observe progress by polling
//! snapshots. Completed stages are never rolled back, so a cancelled
//! run still exposes everything merged before the signal arrived.

use crate::settings::Settings;
use dashmap::DashMap;
use delphi_core::{RunId, RunPhase, RunState};
use delphi_pipeline::Pipeline;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Controller-level view of the latest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running { run_id: RunId, stage: usize },
    Completed { run_id: RunId },
    Failed { run_id: RunId },
}

struct RunEntry {
    shared: Arc<RwLock<RunState>>,
    cancel: watch::Sender<bool>,
}

pub struct RunController {
    runs: DashMap<RunId, RunEntry>,
    latest: Mutex<Option<RunId>>,
}

impl RunController {
    pub fn new() -> Self {
        Self {
            runs: DashMap::new(),
            latest: Mutex::new(None),
        }
    }

    /// Spawn a pipeline run for `subject` and return its id immediately
    pub fn start_run(&self, pipeline: Arc<Pipeline>, subject: &str) -> RunId {
        let state = RunState::new(subject);
        let run_id = state.run_id;
        let shared = Arc::new(RwLock::new(state));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        log::info!("starting run {run_id} for {subject}");
        {
            let shared = Arc::clone(&shared);
            tokio::spawn(async move {
                // Terminal phase and run_error are written into the
                // shared record; the return value is already logged.
                let _ = pipeline.execute(shared, cancel_rx).await;
            });
        }

        self.runs.insert(
            run_id,
            RunEntry {
                shared,
                cancel: cancel_tx,
            },
        );
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(run_id);
        }
        run_id
    }

    /// Snapshot of one run's record
    pub async fn run_state(&self, run_id: RunId) -> Option<RunState> {
        let shared = self.runs.get(&run_id).map(|e| Arc::clone(&e.shared))?;
        Some(shared.read().await.clone())
    }

    /// Signal cancellation; returns false for an unknown run
    pub fn cancel(&self, run_id: RunId) -> bool {
        match self.runs.get(&run_id) {
            Some(entry) => entry.cancel.send(true).is_ok(),
            None => false,
        }
    }

    /// Status of the most recently started run
    pub async fn status(&self) -> RunStatus {
        let latest = match self.latest.lock() {
            Ok(guard) => *guard,
            Err(_) => None,
        };
        let Some(run_id) = latest else {
            return RunStatus::Idle;
        };
        match self.run_state(run_id).await.map(|s| s.phase) {
            Some(RunPhase::Completed) => RunStatus::Completed { run_id },
            Some(RunPhase::Failed) => RunStatus::Failed { run_id },
            Some(RunPhase::Running { stage }) => RunStatus::Running { run_id, stage },
            Some(RunPhase::Pending) => RunStatus::Running { run_id, stage: 0 },
            None => RunStatus::Idle,
        }
    }

    /// Poll until the run reaches a terminal phase
    pub async fn wait_for_terminal(&self, run_id: RunId) -> Option<RunState> {
        loop {
            let state = self.run_state(run_id).await?;
            if state.phase.is_terminal() {
                return Some(state);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Default for RunController {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: default pipeline against sample data and a paper broker
pub fn sample_pipeline(
    settings: &Settings,
) -> delphi_pipeline::PipelineResult<(Arc<Pipeline>, Arc<delphi_gateway::PaperBroker>)> {
    use delphi_gateway::{PaperBroker, SampleFeed};

    let feed = Arc::new(match settings.feed_seed {
        Some(seed) => SampleFeed::with_seed(seed),
        None => SampleFeed::new(),
    });
    let broker = Arc::new(PaperBroker::new());
    let pipeline = crate::plan::default_pipeline(settings, feed, Arc::clone(&broker) as _)
        .map(Arc::new)?;
    Ok((pipeline, broker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_settings() -> Settings {
        Settings {
            lookback_days: 1,
            feed_seed: Some(7),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_start_run_returns_before_completion() {
        let controller = RunController::new();
        let (pipeline, _broker) = sample_pipeline(&quick_settings()).unwrap();

        let run_id = controller.start_run(pipeline, "RELIANCE");
        let final_state = controller.wait_for_terminal(run_id).await.unwrap();

        assert_eq!(final_state.phase, RunPhase::Completed);
        assert_eq!(final_state.subject, "RELIANCE");
        assert_eq!(
            controller.status().await,
            RunStatus::Completed { run_id }
        );
    }

    #[tokio::test]
    async fn test_unknown_run_cannot_be_cancelled_or_polled() {
        let controller = RunController::new();
        let ghost = delphi_core::RunState::new("X").run_id;

        assert!(!controller.cancel(ghost));
        assert!(controller.run_state(ghost).await.is_none());
        assert_eq!(controller.status().await, RunStatus::Idle);
    }

    #[tokio::test]
    async fn test_cancelled_run_ends_failed() {
        let controller = RunController::new();
        let (pipeline, broker) = sample_pipeline(&quick_settings()).unwrap();

        let run_id = controller.start_run(pipeline, "RELIANCE");
        assert!(controller.cancel(run_id));
        let final_state = controller.wait_for_terminal(run_id).await.unwrap();

        assert_eq!(final_state.phase, RunPhase::Failed);
        assert!(final_state.run_error.is_some());
        assert!(broker.placed().is_empty());
    }
}
