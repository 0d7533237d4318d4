//! Market data ingest task
//!
//! Pulls the current quote and the trailing bar history through the
//! `MarketData` port and writes the `market` section every other task
//! reads. A feed failure here is a collaborator error; the pipeline
//! records it and the rest of the run degrades to defaults.

use crate::report::{MarketReport, Tier, Trend};
use crate::section;
use async_trait::async_trait;
use delphi_core::{Interval, RunState};
use delphi_gateway::MarketData;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;
use std::sync::Arc;

/// Fetch the market section every downstream analyst depends on
pub(crate) fn require_market(state: &RunState) -> Result<MarketReport, TaskError> {
    state
        .section_as::<MarketReport>(section::MARKET)
        .ok_or_else(|| TaskError::MissingInput(section::MARKET.to_string()))
}

pub struct MarketDataTask {
    feed: Arc<dyn MarketData>,
    symbol: String,
    interval: Interval,
    lookback_days: u32,
}

impl MarketDataTask {
    pub fn new(
        feed: Arc<dyn MarketData>,
        symbol: impl Into<String>,
        interval: Interval,
        lookback_days: u32,
    ) -> Self {
        Self {
            feed,
            symbol: symbol.into(),
            interval,
            lookback_days,
        }
    }
}

#[async_trait]
impl AnalysisTask for MarketDataTask {
    fn name(&self) -> &str {
        "market_data"
    }

    fn section(&self) -> &str {
        section::MARKET
    }

    async fn run(&self, _state: &RunState) -> TaskResult {
        let quote = self
            .feed
            .quote(&self.symbol)
            .await
            .map_err(|e| TaskError::Collaborator(e.to_string()))?;
        let history = self
            .feed
            .history(&self.symbol, self.interval, self.lookback_days)
            .await
            .map_err(|e| TaskError::Collaborator(e.to_string()))?;
        if history.is_empty() {
            return Err(TaskError::UnusableData(format!(
                "no history for {}",
                self.symbol
            )));
        }

        // Simple snapshot classification: position within the day's
        // range gives the trend, range width gives the volatility tier.
        let midpoint = (quote.high + quote.low) / 2.0;
        let trend = if quote.last_price > midpoint {
            Trend::Bullish
        } else if quote.last_price < midpoint {
            Trend::Bearish
        } else {
            Trend::Sideways
        };
        let range = (quote.high - quote.low).max(0.0);
        let volatility = if range > quote.last_price * 0.02 {
            Tier::High
        } else if range > quote.last_price * 0.01 {
            Tier::Medium
        } else {
            Tier::Low
        };

        let report = MarketReport {
            symbol: quote.symbol.clone(),
            current_price: quote.last_price,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            trend,
            volatility,
            support_level: quote.low * 0.995,
            resistance_level: quote.high * 1.005,
            history,
        };
        let bars = report.history.len();

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "market_data: {} @ {:.2}, {} bars of {}",
            self.symbol,
            quote.last_price,
            bars,
            self.interval.as_str(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delphi_gateway::SampleFeed;

    #[tokio::test]
    async fn test_market_section_has_quote_and_history() {
        let feed = Arc::new(SampleFeed::with_seed(11));
        let task = MarketDataTask::new(feed, "RELIANCE", Interval::Minute15, 2);
        let state = RunState::new("RELIANCE");

        let output = task.run(&state).await.unwrap();
        let report: MarketReport = serde_json::from_value(output.value).unwrap();

        assert_eq!(report.symbol, "RELIANCE");
        assert!(report.current_price > 0.0);
        assert_eq!(report.history.len(), 2 * 96);
        assert!(report.support_level < report.low);
        assert!(report.resistance_level > report.high);
        assert_eq!(output.log.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_failure_is_collaborator_error() {
        let feed = Arc::new(SampleFeed::with_seed(11));
        let task = MarketDataTask::new(feed, "", Interval::Minute15, 2);
        let state = RunState::new("");

        assert!(matches!(
            task.run(&state).await,
            Err(TaskError::Collaborator(_))
        ));
    }
}
