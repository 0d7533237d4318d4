//! Fundamentals task
//!
//! A rule-table stand-in for a research desk: price band picks the
//! health/valuation/growth labels, the target sits 15% above spot and
//! anything not fairly valued earns a BUY.

use crate::market::require_market;
use crate::report::{Action, FundamentalsReport, Strength, Tier, Valuation};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct FundamentalsTask;

#[async_trait]
impl AnalysisTask for FundamentalsTask {
    fn name(&self) -> &str {
        "fundamentals"
    }

    fn section(&self) -> &str {
        section::FUNDAMENTALS
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let price = market.current_price;

        let (financial_health, valuation, growth_potential) = if price > 2000.0 {
            (Strength::Strong, Valuation::FairlyValued, Tier::Medium)
        } else if price > 1000.0 {
            (Strength::Moderate, Valuation::Undervalued, Tier::High)
        } else {
            (Strength::Moderate, Valuation::FairlyValued, Tier::Medium)
        };

        let recommendation = if valuation == Valuation::FairlyValued {
            Action::Hold
        } else {
            Action::Buy
        };
        let price_target = price * 1.15;

        let report = FundamentalsReport {
            financial_health,
            valuation,
            growth_potential,
            price_target,
            recommendation,
            thesis: format!(
                "At {:.2}, {} shows {:?} fundamentals with {:?} growth potential \
                 and appears {:?} at current levels",
                price, market.symbol, financial_health, growth_potential, valuation,
            ),
            confidence: 75,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "fundamentals: {} {}, target {:.2}",
            market.symbol, recommendation, price_target,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{market_with_closes, state_with_market};

    async fn report_for_price(price: f64) -> FundamentalsReport {
        let market = market_with_closes(&[price]);
        let state = state_with_market(&market);
        let output = FundamentalsTask.run(&state).await.unwrap();
        serde_json::from_value(output.value).unwrap()
    }

    #[tokio::test]
    async fn test_large_cap_price_band_holds() {
        let report = report_for_price(2450.75).await;
        assert_eq!(report.financial_health, Strength::Strong);
        assert_eq!(report.valuation, Valuation::FairlyValued);
        assert_eq!(report.recommendation, Action::Hold);
        assert!((report.price_target - 2450.75 * 1.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_mid_band_is_undervalued_buy() {
        let report = report_for_price(1645.25).await;
        assert_eq!(report.valuation, Valuation::Undervalued);
        assert_eq!(report.growth_potential, Tier::High);
        assert_eq!(report.recommendation, Action::Buy);
    }

    #[tokio::test]
    async fn test_low_band_holds() {
        let report = report_for_price(415.30).await;
        assert_eq!(report.financial_health, Strength::Moderate);
        assert_eq!(report.recommendation, Action::Hold);
    }
}
