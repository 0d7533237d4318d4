//! Portfolio decision task
//!
//! The final call: fundamentals, sentiment and news each cast a
//! BUY/SELL/HOLD vote and the plurality wins. A BUY earns a 1.5%
//! allocation, a HOLD keeps a token 1%, a SELL allocates nothing.
//! Stops and targets bracket the entry at -5% / +10%.

use crate::market::require_market;
use crate::report::{
    Action, DecisionReport, FundamentalsReport, Implication, NewsCall, NewsReport,
    SentimentReport,
};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;

pub struct DecisionTask;

#[async_trait]
impl AnalysisTask for DecisionTask {
    fn name(&self) -> &str {
        "portfolio_decision"
    }

    fn section(&self) -> &str {
        section::DECISION
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let market = require_market(state)?;
        let price = market.current_price;

        let fundamentals_vote = state
            .section_as::<FundamentalsReport>(section::FUNDAMENTALS)
            .map(|f| f.recommendation)
            .unwrap_or(Action::Hold);
        let sentiment_vote = state
            .section_as::<SentimentReport>(section::SENTIMENT)
            .map(|s| match s.implication {
                Implication::BuyMomentum => Action::Buy,
                Implication::SellPressure => Action::Sell,
                Implication::SidewaysAction => Action::Hold,
            })
            .unwrap_or(Action::Hold);
        let news_vote = state
            .section_as::<NewsReport>(section::NEWS)
            .map(|n| match n.recommendation {
                NewsCall::BuyNews => Action::Buy,
                NewsCall::SellNews => Action::Sell,
                NewsCall::Hold => Action::Hold,
            })
            .unwrap_or(Action::Hold);

        let votes = [fundamentals_vote, sentiment_vote, news_vote];
        let buy_votes = votes.iter().filter(|v| **v == Action::Buy).count();
        let sell_votes = votes.iter().filter(|v| **v == Action::Sell).count();
        let hold_votes = votes.iter().filter(|v| **v == Action::Hold).count();

        let (action, position_percent) = if buy_votes > sell_votes && buy_votes > hold_votes {
            (Action::Buy, 1.5)
        } else if sell_votes > buy_votes && sell_votes > hold_votes {
            (Action::Sell, 0.0)
        } else {
            (Action::Hold, 1.0)
        };

        let stop_loss = price * 0.95;
        let take_profit = price * 1.10;
        let risk_reward_ratio = if price > stop_loss {
            (take_profit - price) / (price - stop_loss)
        } else {
            1.0
        };

        let report = DecisionReport {
            action,
            position_percent,
            entry_price: price,
            stop_loss,
            take_profit,
            risk_reward_ratio,
            buy_votes,
            sell_votes,
            hold_votes,
            rationale: format!(
                "Consensus across analyst teams: {buy_votes} buy, {sell_votes} sell, \
                 {hold_votes} hold",
            ),
            confidence: 75,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "portfolio_decision: {} at {:.2} ({}% allocation)",
            action, price, position_percent,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Polarity, Strength, Tier, Trend, Valuation};
    use crate::testutil::{insert, market_with_closes, state_with_market};

    fn fundamentals_voting(recommendation: Action) -> FundamentalsReport {
        FundamentalsReport {
            financial_health: Strength::Moderate,
            valuation: Valuation::Undervalued,
            growth_potential: Tier::High,
            price_target: 230.0,
            recommendation,
            thesis: String::new(),
            confidence: 75,
        }
    }

    fn sentiment_voting(implication: Implication) -> SentimentReport {
        SentimentReport {
            overall_sentiment: Trend::Sideways,
            strength: Strength::Moderate,
            score: 0.5,
            social_media_buzz: Tier::Medium,
            implication,
            confidence: 70,
        }
    }

    fn news_voting(recommendation: NewsCall) -> NewsReport {
        NewsReport {
            overall_sentiment: Polarity::Neutral,
            impact_score: 0.5,
            key_catalysts: vec![],
            risk_factors: vec![],
            most_impactful: String::new(),
            recommendation,
            confidence: 75,
        }
    }

    async fn decide(state: &RunState) -> DecisionReport {
        let output = DecisionTask.run(state).await.unwrap();
        serde_json::from_value(output.value).unwrap()
    }

    #[tokio::test]
    async fn test_buy_plurality_wins() {
        let mut state = state_with_market(&market_with_closes(&[200.0]));
        insert(&mut state, section::FUNDAMENTALS, &fundamentals_voting(Action::Buy));
        insert(
            &mut state,
            section::SENTIMENT,
            &sentiment_voting(Implication::BuyMomentum),
        );
        insert(&mut state, section::NEWS, &news_voting(NewsCall::Hold));

        let report = decide(&state).await;
        assert_eq!(report.action, Action::Buy);
        assert_eq!(report.position_percent, 1.5);
        assert_eq!((report.buy_votes, report.sell_votes, report.hold_votes), (2, 0, 1));
        assert!((report.stop_loss - 190.0).abs() < 1e-9);
        assert!((report.take_profit - 220.0).abs() < 1e-9);
        assert!((report.risk_reward_ratio - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sell_majority_allocates_nothing() {
        let mut state = state_with_market(&market_with_closes(&[200.0]));
        insert(&mut state, section::FUNDAMENTALS, &fundamentals_voting(Action::Sell));
        insert(
            &mut state,
            section::SENTIMENT,
            &sentiment_voting(Implication::SellPressure),
        );
        insert(&mut state, section::NEWS, &news_voting(NewsCall::SellNews));

        let report = decide(&state).await;
        assert_eq!(report.action, Action::Sell);
        assert_eq!(report.position_percent, 0.0);
    }

    #[tokio::test]
    async fn test_missing_analyst_sections_count_as_hold() {
        let state = state_with_market(&market_with_closes(&[200.0]));
        let report = decide(&state).await;
        assert_eq!(report.action, Action::Hold);
        assert_eq!(report.hold_votes, 3);
        assert_eq!(report.position_percent, 1.0);
    }

    #[tokio::test]
    async fn test_split_vote_holds() {
        let mut state = state_with_market(&market_with_closes(&[200.0]));
        insert(&mut state, section::FUNDAMENTALS, &fundamentals_voting(Action::Buy));
        insert(
            &mut state,
            section::SENTIMENT,
            &sentiment_voting(Implication::SellPressure),
        );
        insert(&mut state, section::NEWS, &news_voting(NewsCall::Hold));

        let report = decide(&state).await;
        assert_eq!(report.action, Action::Hold);
    }
}
