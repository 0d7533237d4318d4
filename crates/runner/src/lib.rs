//! Delphi Runner - orchestration for analysis runs
//!
//! Wires the pieces together and drives complete runs:
//!
//! - **Settings**: env-driven configuration with offline defaults
//! - **Plan**: the default six-stage pipeline
//! - **Controller**: run registry, polling snapshots, cancellation
//! - **Summary**: final results logging
//!
//! ```text
//!        ┌────────────┐   start_run    ┌───────────────┐
//!        │ Controller │ ─────────────► │   Pipeline    │
//!        │  (registry)│ ◄───────────── │  (6 stages)   │
//!        └─────┬──────┘   snapshots    └───────┬───────┘
//!              │ poll                          │ ports
//!              ▼                               ▼
//!        run status                 SampleFeed / PaperBroker
//! ```

pub mod controller;
pub mod plan;
pub mod settings;
pub mod summary;

// Re-export main types
pub use controller::{RunController, RunStatus, sample_pipeline};
pub use plan::default_pipeline;
pub use settings::{Settings, SettingsError};
pub use summary::log_run_summary;
