//! IndicatorSet - all configured indicators computed from one series
//!
//! Produced fresh each run by the technical-analysis task and stored as
//! one section document. Absent values mean "insufficient data", never
//! an error.

use crate::engine::{self, Bollinger, Macd, Stochastic};
use delphi_core::PriceSeries;
use serde::{Deserialize, Serialize};

/// Periods for the full indicator set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub sma_short_period: usize,
    pub sma_long_period: usize,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub stochastic_period: usize,
    pub atr_period: usize,
    pub volume_sma_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_short_period: 20,
            sma_long_period: 50,
            ema_fast_period: 12,
            ema_slow_period: 26,
            bollinger_period: 20,
            bollinger_k: 2.0,
            stochastic_period: 14,
            atr_period: 14,
            volume_sma_period: 20,
        }
    }
}

/// Keyed indicator outputs for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub bollinger: Option<Bollinger>,
    pub macd: Option<Macd>,
    pub stochastic: Option<Stochastic>,
    pub atr: Option<f64>,
    pub volume_sma: Option<f64>,
}

impl IndicatorSet {
    /// Compute every configured indicator from a price series.
    ///
    /// Indicators whose minimum sample size exceeds the series length
    /// come back `None` individually; one short window never poisons
    /// the rest of the set.
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Self {
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        Self {
            rsi: engine::rsi(&closes, config.rsi_period),
            sma_short: engine::sma(&closes, config.sma_short_period),
            sma_long: engine::sma(&closes, config.sma_long_period),
            ema_fast: engine::ema(&closes, config.ema_fast_period),
            ema_slow: engine::ema(&closes, config.ema_slow_period),
            bollinger: engine::bollinger(&closes, config.bollinger_period, config.bollinger_k),
            macd: engine::macd(&closes, config.ema_fast_period, config.ema_slow_period),
            stochastic: engine::stochastic(&highs, &lows, &closes, config.stochastic_period),
            atr: engine::atr(&highs, &lows, &closes, config.atr_period),
            volume_sma: engine::sma(&volumes, config.volume_sma_period),
        }
    }
}
