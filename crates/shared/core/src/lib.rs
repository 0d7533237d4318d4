//! Delphi Core Domain
//!
//! Pure domain types for the Delphi analysis pipeline.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod error;
pub mod market;
pub mod order;
pub mod run;

// Re-export commonly used types at crate root
pub use error::CoreError;
pub use market::{Bar, Interval, PriceSeries, Quote};
pub use order::{OrderReceipt, OrderRequest, OrderSide, OrderStatus};
pub use run::{RunId, RunPhase, RunState};
