//! Delphi Analysts
//!
//! The concrete analysis tasks that run inside the pipeline. Each task
//! implements `AnalysisTask`, owns exactly one section of the run
//! record and serialises a typed report into it:
//!
//! ```text
//! ingest      market
//! analysts    technical  fundamentals  sentiment  news
//! research    bull  bear
//! signal      signal
//! risk        risk
//! decision    decision  execution
//! ```
//!
//! Downstream tasks read upstream sections defensively: an absent or
//! malformed document degrades to a documented default (HOLD, neutral,
//! rejected) instead of failing the run. Only the market section is a
//! hard prerequisite; analysis without market data is meaningless.

pub mod decision;
pub mod execution;
pub mod fundamentals;
pub mod market;
pub mod news;
pub mod report;
pub mod research;
pub mod risk;
pub mod section;
pub mod sentiment;
pub mod signal;
pub mod technical;
#[cfg(test)]
pub(crate) mod testutil;

// Re-export the task types
pub use decision::DecisionTask;
pub use execution::ExecutionTask;
pub use fundamentals::FundamentalsTask;
pub use market::MarketDataTask;
pub use news::{NewsItem, NewsTask};
pub use research::{BearResearchTask, BullResearchTask};
pub use risk::RiskTask;
pub use sentiment::SentimentTask;
pub use signal::SignalTask;
pub use technical::TechnicalAnalysisTask;
