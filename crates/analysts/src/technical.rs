//! Technical analysis task
//!
//! Computes the full indicator set from the ingested bar history, then
//! scores it: RSI zones and the SMA 20/50 crossover move a neutral 50
//! score up or down, and the score drives trend and momentum labels.

use crate::market::require_market;
use crate::report::{Momentum, RsiZone, Strength, TechnicalReport, Trend};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_indicators::{IndicatorConfig, IndicatorSet};
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct TechnicalAnalysisTask {
    config: IndicatorConfig,
    rsi_overbought: f64,
    rsi_oversold: f64,
}

impl TechnicalAnalysisTask {
    pub fn new(config: IndicatorConfig, rsi_overbought: f64, rsi_oversold: f64) -> Self {
        Self {
            config,
            rsi_overbought,
            rsi_oversold,
        }
    }

    fn rsi_zone(&self, rsi: Option<f64>) -> RsiZone {
        match rsi {
            Some(value) if value > self.rsi_overbought => RsiZone::Overbought,
            Some(value) if value < self.rsi_oversold => RsiZone::Oversold,
            _ => RsiZone::Neutral,
        }
    }
}

fn ma_trend(indicators: &IndicatorSet, price: f64) -> Trend {
    match (indicators.sma_short, indicators.sma_long) {
        (Some(short), Some(long)) if short > long && price > short => Trend::Bullish,
        (Some(short), Some(long)) if short < long && price < short => Trend::Bearish,
        _ => Trend::Sideways,
    }
}

#[async_trait]
impl AnalysisTask for TechnicalAnalysisTask {
    fn name(&self) -> &str {
        "technical_analysis"
    }

    fn section(&self) -> &str {
        section::TECHNICAL
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let indicators = IndicatorSet::compute(&market.history, &self.config);

        let rsi_zone = self.rsi_zone(indicators.rsi);
        let ma = ma_trend(&indicators, market.current_price);

        let mut score = 50;
        match rsi_zone {
            RsiZone::Oversold => score += 15,
            RsiZone::Overbought => score -= 15,
            RsiZone::Neutral => {}
        }
        match ma {
            Trend::Bullish => score += 10,
            Trend::Bearish => score -= 10,
            Trend::Sideways => {}
        }
        let score = score.clamp(0, 100);

        let (trend_direction, trend_strength) = match rsi_zone {
            RsiZone::Overbought => (Trend::Bearish, Strength::Strong),
            RsiZone::Oversold => (Trend::Bullish, Strength::Strong),
            RsiZone::Neutral => (Trend::Sideways, Strength::Moderate),
        };
        let momentum = if score > 55 {
            Momentum::Positive
        } else if score < 45 {
            Momentum::Negative
        } else {
            Momentum::Neutral
        };

        let report = TechnicalReport {
            indicators,
            trend_direction,
            trend_strength,
            momentum,
            rsi_zone,
            support_level: market.current_price * 0.98,
            resistance_level: market.current_price * 1.02,
            overall_score: score,
        };

        let log = format!(
            "technical_analysis: trend {:?}, rsi {}, score {}",
            report.trend_direction,
            report
                .indicators
                .rsi
                .map(|r| format!("{r:.1}"))
                .unwrap_or_else(|| "n/a".to_string()),
            score,
        );
        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{market_with_closes, state_with_market};

    fn default_task() -> TechnicalAnalysisTask {
        TechnicalAnalysisTask::new(IndicatorConfig::default(), 70.0, 30.0)
    }

    #[tokio::test]
    async fn test_missing_market_section_fails() {
        let state = RunState::new("RELIANCE");
        assert_eq!(
            default_task().run(&state).await.err(),
            Some(TaskError::MissingInput("market".to_string()))
        );
    }

    #[tokio::test]
    async fn test_monotonic_rise_is_overbought_and_bearish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let market = market_with_closes(&closes);
        let state = state_with_market(&market);

        let output = default_task().run(&state).await.unwrap();
        let report: TechnicalReport = serde_json::from_value(output.value).unwrap();

        assert_eq!(report.rsi_zone, RsiZone::Overbought);
        assert_eq!(report.trend_direction, Trend::Bearish);
        assert_eq!(report.indicators.rsi, Some(100.0));
        assert!(report.overall_score < 50);
    }

    #[tokio::test]
    async fn test_short_history_degrades_to_neutral() {
        let market = market_with_closes(&[100.0, 101.0, 102.0]);
        let state = state_with_market(&market);

        let output = default_task().run(&state).await.unwrap();
        let report: TechnicalReport = serde_json::from_value(output.value).unwrap();

        assert_eq!(report.indicators.rsi, None);
        assert_eq!(report.rsi_zone, RsiZone::Neutral);
        assert_eq!(report.overall_score, 50);
        assert_eq!(report.momentum, Momentum::Neutral);
    }
}
