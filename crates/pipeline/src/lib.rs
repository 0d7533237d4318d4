//! Delphi Pipeline - staged execution of analysis tasks
//!
//! Runs an ordered list of named stages against one `RunState`. Each
//! stage executes its tasks either concurrently or in declared order,
//! then merges every task's partial update at a barrier before the next
//! stage starts:
//!
//! ```text
//!                ┌────────────────────────────────────┐
//!                │             RunState               │
//!                └──────┬──────────────────────▲──────┘
//!                       │ snapshot             │ merge (declaration order)
//!                       ▼                      │
//!   Stage i   ┌──────────────────────────────────────┐
//!  (parallel) │  task A ──┐                          │
//!             │  task B ──┼──► barrier ──► merge ────┤
//!             │  task C ──┘                          │
//!             └──────────────────────────────────────┘
//!                       │
//!                       ▼
//!   Stage i+1 (sequential): task D ► merge ► task E ► merge ► ...
//! ```
//!
//! Guarantees:
//! - A task failure is logged and its section left absent; the run
//!   still completes.
//! - Merge order equals task-declaration order regardless of
//!   completion order.
//! - Duplicate output sections within a stage are rejected at
//!   construction, before anything executes.
//! - Cancellation aborts unfinished tasks in the active stage; finished
//!   tasks keep their updates, earlier stages are never rolled back.

pub mod error;
pub mod executor;
pub mod stage;
pub mod task;

// Re-export main types
pub use error::{PipelineError, PipelineResult, TaskError};
pub use executor::Pipeline;
pub use stage::{Stage, StageMode};
pub use task::{AnalysisTask, TaskOutput, TaskResult};
