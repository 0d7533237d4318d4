//! Signal generation task
//!
//! Turns the technical picture into an actionable BUY/SELL/HOLD call.
//! RSI extremes dominate; otherwise the overall technical score decides.
//! The moving-average crossover and volume confirmation ride along as
//! secondary signals for the risk and decision stages.

use crate::market::require_market;
use crate::report::{Action, SignalReport, Strength, TechnicalReport};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_indicators::IndicatorSet;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct SignalTask {
    rsi_overbought: f64,
    rsi_oversold: f64,
    stop_loss_percent: f64,
}

impl SignalTask {
    pub fn new(rsi_overbought: f64, rsi_oversold: f64, stop_loss_percent: f64) -> Self {
        Self {
            rsi_overbought,
            rsi_oversold,
            stop_loss_percent,
        }
    }
}

fn ma_signal(indicators: &IndicatorSet, price: f64) -> (Action, Strength) {
    match (indicators.sma_short, indicators.sma_long) {
        (Some(short), Some(long)) if short > long && price > short => {
            let strength = if price > short * 1.02 {
                Strength::Strong
            } else {
                Strength::Moderate
            };
            (Action::Buy, strength)
        }
        (Some(short), Some(long)) if short < long && price < short => {
            let strength = if price < short * 0.98 {
                Strength::Strong
            } else {
                Strength::Moderate
            };
            (Action::Sell, strength)
        }
        _ => (Action::Hold, Strength::Weak),
    }
}

fn volume_confirmation(indicators: &IndicatorSet, volume: f64) -> Strength {
    match indicators.volume_sma {
        Some(avg) if volume > avg * 1.5 => Strength::Strong,
        Some(avg) if volume > avg * 1.2 => Strength::Moderate,
        _ => Strength::Weak,
    }
}

#[async_trait]
impl AnalysisTask for SignalTask {
    fn name(&self) -> &str {
        "signal_generation"
    }

    fn section(&self) -> &str {
        section::SIGNAL
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let technical = state.section_as::<TechnicalReport>(section::TECHNICAL);

        let indicators = technical
            .as_ref()
            .map(|t| t.indicators.clone())
            .unwrap_or_default();
        let score = technical.as_ref().map(|t| t.overall_score).unwrap_or(50);
        let rsi = indicators.rsi;
        let price = market.current_price;

        let (signal, strength, confidence) = match rsi {
            Some(r) if r < self.rsi_oversold => {
                if r < 25.0 {
                    (Action::Buy, Strength::Strong, 82)
                } else {
                    (Action::Buy, Strength::Moderate, 75)
                }
            }
            Some(r) if r > self.rsi_overbought => {
                if r > 75.0 {
                    (Action::Sell, Strength::Strong, 78)
                } else {
                    (Action::Sell, Strength::Moderate, 70)
                }
            }
            _ if score > 60 => (Action::Buy, Strength::Moderate, 68),
            _ if score < 40 => (Action::Sell, Strength::Moderate, 62),
            _ => (Action::Hold, Strength::Weak, 58),
        };

        let (stop_loss, take_profit) = match signal {
            Action::Buy => (
                price * (1.0 - self.stop_loss_percent),
                price * (1.0 + self.stop_loss_percent * 2.0),
            ),
            Action::Sell => (
                price * (1.0 + self.stop_loss_percent),
                price * (1.0 - self.stop_loss_percent * 2.0),
            ),
            Action::Hold => (0.0, 0.0),
        };

        let (ma, ma_str) = ma_signal(&indicators, price);
        let volume_conf = volume_confirmation(&indicators, market.volume);

        let report = SignalReport {
            signal,
            strength,
            confidence,
            entry_price: price,
            stop_loss,
            take_profit,
            ma_signal: ma,
            ma_strength: ma_str,
            volume_confirmation: volume_conf,
            reasoning: format!(
                "RSI {}, technical score {}, MA signal {}",
                rsi.map(|r| format!("{r:.1}"))
                    .unwrap_or_else(|| "n/a".to_string()),
                score,
                ma,
            ),
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "signal_generation: {} ({:?}, confidence {})",
            signal, strength, confidence,
        )))
    }
}
