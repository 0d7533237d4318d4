//! Run record - the single shared state threaded through one pipeline run
//!
//! `RunState` is exclusively owned by the pipeline executor while a run is
//! in flight. Tasks see snapshots; the executor's merge barrier is the
//! only writer. The record grows monotonically: log lines are appended,
//! sections are inserted, nothing is removed short of starting a new run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Opaque run identifier, assigned once at run creation
pub type RunId = Uuid;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunPhase {
    /// Created, not yet executing
    Pending,
    /// Executing the stage at this index
    Running { stage: usize },
    /// All declared stages were attempted (individual tasks may have failed)
    Completed,
    /// An executor-level fatal condition occurred; see `run_error`
    Failed,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Completed | RunPhase::Failed)
    }
}

/// The single mutable record threaded through a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique run identifier, immutable after creation
    pub run_id: RunId,
    /// Instrument being analyzed, immutable after creation
    pub subject: String,
    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
    /// Append-only, ordered; any component may append, never remove
    pub log: Vec<String>,
    /// Section name -> opaque result document; one declared writer per name
    pub sections: BTreeMap<String, Value>,
    /// Lifecycle phase
    pub phase: RunPhase,
    /// Terminal error marker; present only when the run itself failed
    pub run_error: Option<String>,
}

impl RunState {
    /// Create an empty run record for a subject
    pub fn new(subject: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            subject: subject.to_string(),
            created_at: Utc::now(),
            log: Vec::new(),
            sections: BTreeMap::new(),
            phase: RunPhase::Pending,
            run_error: None,
        }
    }

    /// Append one log line
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Insert (or overwrite, for the declared producer) a section document
    pub fn insert_section(&mut self, name: &str, value: Value) {
        self.sections.insert(name.to_string(), value);
    }

    /// Raw section lookup
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// Deserialize a section into a typed document.
    ///
    /// Returns `None` when the section is absent or has an unexpected
    /// shape; downstream tasks fall back to their documented defaults.
    pub fn section_as<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.sections
            .get(name)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Mark the run fatally failed
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.phase = RunPhase::Failed;
        self.run_error = Some(reason.into());
    }
}
