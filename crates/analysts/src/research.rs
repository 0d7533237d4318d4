//! Bull and bear research tasks
//!
//! The debate stage: both sides read the analyst sections and argue
//! their case. The bull sizes the upside off valuation and growth, the
//! bear sizes the downside off valuation and sentiment. Missing analyst
//! sections shrink the argument to its base case rather than failing.

use crate::market::require_market;
use crate::report::{
    FundamentalsReport, ResearchReport, SentimentReport, Strength, Tier, Timeline, Trend,
    Valuation,
};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct BullResearchTask;

#[async_trait]
impl AnalysisTask for BullResearchTask {
    fn name(&self) -> &str {
        "bull_research"
    }

    fn section(&self) -> &str {
        section::BULL
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let fundamentals = state.section_as::<FundamentalsReport>(section::FUNDAMENTALS);
        let sentiment = state.section_as::<SentimentReport>(section::SENTIMENT);

        let move_potential = match &fundamentals {
            Some(f) if f.valuation == Valuation::Undervalued => "25-35%",
            Some(f) if f.growth_potential == Tier::High => "20-30%",
            _ => "15-25%",
        };
        let timeline = match &sentiment {
            Some(s) if s.overall_sentiment == Trend::Bullish => Timeline::ShortTerm,
            _ => Timeline::MediumTerm,
        };

        let mut key_points = vec![
            "Strong fundamentals support".to_string(),
            "Positive market sentiment building".to_string(),
            "Technical breakout potential".to_string(),
        ];
        if fundamentals
            .as_ref()
            .is_some_and(|f| f.financial_health == Strength::Strong)
        {
            key_points.push("Robust financial position".to_string());
        }

        let report = ResearchReport {
            thesis: format!(
                "{} presents compelling upside with {} potential, entry on dips \
                 below {:.2}, stop at {:.2}",
                market.symbol,
                move_potential,
                market.current_price * 0.98,
                market.current_price * 0.95,
            ),
            move_potential: move_potential.to_string(),
            timeline,
            key_points,
            recommended_action: "ACCUMULATE".to_string(),
            confidence: 75,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "bull_research: upside {} over {:?}",
            move_potential, timeline,
        )))
    }
}

pub struct BearResearchTask;

#[async_trait]
impl AnalysisTask for BearResearchTask {
    fn name(&self) -> &str {
        "bear_research"
    }

    fn section(&self) -> &str {
        section::BEAR
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let fundamentals = state.section_as::<FundamentalsReport>(section::FUNDAMENTALS);
        let sentiment = state.section_as::<SentimentReport>(section::SENTIMENT);

        let move_potential = match (&fundamentals, &sentiment) {
            (Some(f), _) if f.valuation == Valuation::Overvalued => "20-30%",
            (_, Some(s)) if s.overall_sentiment == Trend::Bearish => "15-25%",
            _ => "10-20%",
        };
        // The original keys the bear timeline on a deteriorating
        // sentiment trend; strong bearish sentiment is the nearest
        // observable equivalent.
        let timeline = match &sentiment {
            Some(s)
                if s.overall_sentiment == Trend::Bearish && s.strength == Strength::Strong =>
            {
                Timeline::ShortTerm
            }
            _ => Timeline::MediumTerm,
        };

        let key_points = vec![
            "Market volatility concerns".to_string(),
            "Valuation pressure".to_string(),
            "Macroeconomic headwinds".to_string(),
        ];

        let report = ResearchReport {
            thesis: format!(
                "{} faces downside risk of {} on valuation concerns; defensive \
                 stop at {:.2}",
                market.symbol,
                move_potential,
                market.current_price * 0.90,
            ),
            move_potential: move_potential.to_string(),
            timeline,
            key_points,
            recommended_action: "REDUCE".to_string(),
            confidence: 70,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "bear_research: downside {} over {:?}",
            move_potential, timeline,
        )))
    }
}
