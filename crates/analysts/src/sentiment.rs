//! Sentiment task
//!
//! Reads crowd mood off the tape: intraday change beyond +/- 2% flips
//! the sentiment to strongly bullish or bearish, volume sets the social
//! media buzz tier.

use crate::market::require_market;
use crate::report::{Implication, SentimentReport, Strength, Tier, Trend};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct SentimentTask;

#[async_trait]
impl AnalysisTask for SentimentTask {
    fn name(&self) -> &str {
        "sentiment"
    }

    fn section(&self) -> &str {
        section::SENTIMENT
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;

        let change_percent = if market.open > 0.0 {
            (market.current_price - market.open) / market.open * 100.0
        } else {
            0.0
        };

        let (overall_sentiment, strength, score, implication) = if change_percent > 2.0 {
            (
                Trend::Bullish,
                Strength::Strong,
                0.8,
                Implication::BuyMomentum,
            )
        } else if change_percent < -2.0 {
            (
                Trend::Bearish,
                Strength::Strong,
                0.2,
                Implication::SellPressure,
            )
        } else {
            (
                Trend::Sideways,
                Strength::Moderate,
                0.5,
                Implication::SidewaysAction,
            )
        };

        let social_media_buzz = if market.volume > 1_000_000.0 {
            Tier::High
        } else if market.volume > 500_000.0 {
            Tier::Medium
        } else {
            Tier::Low
        };

        let report = SentimentReport {
            overall_sentiment,
            strength,
            score,
            social_media_buzz,
            implication,
            confidence: 70,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "sentiment: {:?} ({:+.2}% intraday, buzz {:?})",
            overall_sentiment, change_percent, social_media_buzz,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{market_with_closes, state_with_market};

    async fn report_for(open: f64, current: f64, volume: f64) -> SentimentReport {
        let mut market = market_with_closes(&[current]);
        market.open = open;
        market.volume = volume;
        let state = state_with_market(&market);
        let output = SentimentTask.run(&state).await.unwrap();
        serde_json::from_value(output.value).unwrap()
    }

    #[tokio::test]
    async fn test_rally_beyond_two_percent_is_bullish_momentum() {
        let report = report_for(100.0, 103.0, 1_200_000.0).await;
        assert_eq!(report.overall_sentiment, Trend::Bullish);
        assert_eq!(report.implication, Implication::BuyMomentum);
        assert_eq!(report.score, 0.8);
        assert_eq!(report.social_media_buzz, Tier::High);
    }

    #[tokio::test]
    async fn test_selloff_beyond_two_percent_is_sell_pressure() {
        let report = report_for(100.0, 97.0, 300_000.0).await;
        assert_eq!(report.overall_sentiment, Trend::Bearish);
        assert_eq!(report.implication, Implication::SellPressure);
        assert_eq!(report.social_media_buzz, Tier::Low);
    }

    #[tokio::test]
    async fn test_flat_day_is_neutral() {
        let report = report_for(100.0, 100.5, 700_000.0).await;
        assert_eq!(report.overall_sentiment, Trend::Sideways);
        assert_eq!(report.implication, Implication::SidewaysAction);
        assert_eq!(report.score, 0.5);
        assert_eq!(report.social_media_buzz, Tier::Medium);
    }
}
