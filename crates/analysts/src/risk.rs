//! Risk assessment task
//!
//! Scores the proposed trade and sizes the position. The score starts
//! neutral at 50 and moves with signal conviction and ATR volatility;
//! the resulting level maps straight to an approval. Position size
//! comes from risk-per-share against the account's risk budget.

use crate::market::require_market;
use crate::report::{
    Action, Approval, PositionSizing, RiskLevel, RiskReport, SignalReport, TechnicalReport, Tier,
};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct RiskTask {
    account_balance: f64,
    risk_per_trade: f64,
}

impl RiskTask {
    pub fn new(account_balance: f64, risk_per_trade: f64) -> Self {
        Self {
            account_balance,
            risk_per_trade,
        }
    }

    fn position_sizing(&self, entry_price: f64, stop_loss: f64) -> PositionSizing {
        if entry_price <= 0.0 || stop_loss <= 0.0 {
            return PositionSizing::zero();
        }
        let risk_per_share = (entry_price - stop_loss).abs();
        if risk_per_share == 0.0 {
            return PositionSizing::zero();
        }
        let max_risk = self.account_balance * self.risk_per_trade;
        let shares = (max_risk / risk_per_share).floor() as u64;
        PositionSizing {
            shares,
            position_value: shares as f64 * entry_price,
            risk_amount: shares as f64 * risk_per_share,
            risk_per_share,
        }
    }
}

#[async_trait]
impl AnalysisTask for RiskTask {
    fn name(&self) -> &str {
        "risk_assessment"
    }

    fn section(&self) -> &str {
        section::RISK
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let technical = state.section_as::<TechnicalReport>(section::TECHNICAL);
        let signal = state.section_as::<SignalReport>(section::SIGNAL);

        let price = market.current_price;
        let atr = technical
            .as_ref()
            .and_then(|t| t.indicators.atr)
            .unwrap_or(0.0);
        let volume_sma = technical.as_ref().and_then(|t| t.indicators.volume_sma);
        let action = signal.as_ref().map(|s| s.signal).unwrap_or(Action::Hold);
        let confidence = signal.as_ref().map(|s| s.confidence).unwrap_or(50);

        let mut score: i32 = 50;
        if action == Action::Hold {
            score -= 20;
        } else if confidence < 60 {
            score += 15;
        } else if confidence > 80 {
            score -= 10;
        }
        if atr > price * 0.03 {
            score += 20;
        } else if atr < price * 0.01 {
            score -= 10;
        }
        let score = score.clamp(0, 100);

        let (risk_level, approval) = if score > 75 {
            (RiskLevel::Extreme, Approval::Rejected)
        } else if score > 60 {
            (RiskLevel::High, Approval::Conditional)
        } else if score > 40 {
            (RiskLevel::Medium, Approval::Approved)
        } else {
            (RiskLevel::Low, Approval::Approved)
        };

        let volatility_percent = if price > 0.0 { atr / price * 100.0 } else { 0.0 };
        let volatility = if volatility_percent > 5.0 {
            Tier::High
        } else if volatility_percent > 2.0 {
            Tier::Medium
        } else {
            Tier::Low
        };
        let liquidity = match volume_sma {
            Some(avg) if avg > 0.0 => {
                let ratio = market.volume / avg;
                if ratio < 0.5 {
                    Tier::High
                } else if ratio < 0.8 {
                    Tier::Medium
                } else {
                    Tier::Low
                }
            }
            _ => Tier::Medium,
        };
        let gap = if market.close > 0.0 {
            let gap_percent = ((market.open - market.close) / market.close).abs() * 100.0;
            if gap_percent > 3.0 {
                Tier::High
            } else if gap_percent > 1.0 {
                Tier::Medium
            } else {
                Tier::Low
            }
        } else {
            Tier::Medium
        };

        let (entry, stop) = signal
            .as_ref()
            .map(|s| (s.entry_price, s.stop_loss))
            .unwrap_or((0.0, 0.0));
        let position = self.position_sizing(entry, stop);

        let report = RiskReport {
            risk_score: score,
            risk_level,
            volatility,
            liquidity,
            gap,
            approval,
            position,
            stop_loss_recommendation: price * 0.95,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "risk_assessment: score {}, {:?}, {:?}, {} share(s)",
            score, risk_level, approval, report.position.shares,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Strength;
    use crate::testutil::{insert, market_with_closes, state_with_market};
    use delphi_indicators::IndicatorSet;

    fn signal(action: Action, confidence: u8, entry: f64, stop: f64) -> SignalReport {
        SignalReport {
            signal: action,
            strength: Strength::Moderate,
            confidence,
            entry_price: entry,
            stop_loss: stop,
            take_profit: entry * 1.1,
            ma_signal: Action::Hold,
            ma_strength: Strength::Weak,
            volume_confirmation: Strength::Weak,
            reasoning: String::new(),
        }
    }

    fn technical_with_atr(atr: f64) -> TechnicalReport {
        TechnicalReport {
            indicators: IndicatorSet {
                atr: Some(atr),
                volume_sma: Some(800_000.0),
                ..IndicatorSet::default()
            },
            trend_direction: crate::report::Trend::Sideways,
            trend_strength: Strength::Moderate,
            momentum: crate::report::Momentum::Neutral,
            rsi_zone: crate::report::RsiZone::Neutral,
            support_level: 0.0,
            resistance_level: 0.0,
            overall_score: 50,
        }
    }

    #[tokio::test]
    async fn test_calm_buy_is_approved_and_sized() {
        let mut state = state_with_market(&market_with_closes(&[200.0]));
        insert(&mut state, section::TECHNICAL, &technical_with_atr(1.0));
        insert(&mut state, section::SIGNAL, &signal(Action::Buy, 75, 200.0, 190.0));

        let output = RiskTask::new(100_000.0, 0.02).run(&state).await.unwrap();
        let report: RiskReport = serde_json::from_value(output.value).unwrap();

        // 50, no conviction adjustment, low ATR -10 = 40 -> low risk.
        assert_eq!(report.risk_score, 40);
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert_eq!(report.approval, Approval::Approved);
        assert_eq!(report.position.shares, 200);
        assert!((report.position.risk_amount - 2000.0).abs() < 1e-9);
        assert!((report.position.position_value - 40_000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_volatile_low_conviction_trade_is_conditional() {
        let mut state = state_with_market(&market_with_closes(&[200.0]));
        insert(&mut state, section::TECHNICAL, &technical_with_atr(7.0));
        insert(&mut state, section::SIGNAL, &signal(Action::Sell, 55, 200.0, 210.0));

        let output = RiskTask::new(100_000.0, 0.02).run(&state).await.unwrap();
        let report: RiskReport = serde_json::from_value(output.value).unwrap();

        // 50 + 15 (confidence < 60) + 20 (ATR > 3%) = 85 -> extreme.
        assert_eq!(report.risk_score, 85);
        assert_eq!(report.risk_level, RiskLevel::Extreme);
        assert_eq!(report.approval, Approval::Rejected);
        assert_eq!(report.volatility, Tier::Medium);
    }

    #[tokio::test]
    async fn test_hold_signal_lowers_risk() {
        let mut state = state_with_market(&market_with_closes(&[200.0]));
        insert(&mut state, section::SIGNAL, &signal(Action::Hold, 58, 200.0, 0.0));

        let output = RiskTask::new(100_000.0, 0.02).run(&state).await.unwrap();
        let report: RiskReport = serde_json::from_value(output.value).unwrap();

        // 50 - 20 (hold) - 10 (no ATR) = 20 -> low risk, nothing sized.
        assert_eq!(report.risk_score, 20);
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert_eq!(report.position, PositionSizing::zero());
    }

    #[tokio::test]
    async fn test_missing_signal_defaults_to_hold() {
        let state = state_with_market(&market_with_closes(&[200.0]));
        let output = RiskTask::new(100_000.0, 0.02).run(&state).await.unwrap();
        let report: RiskReport = serde_json::from_value(output.value).unwrap();

        assert_eq!(report.approval, Approval::Approved);
        assert_eq!(report.position.shares, 0);
    }
}
