//! News task
//!
//! Tallies headline sentiment over a configurable wire of news items.
//! More positive than negative headlines reads as a buy-news call, the
//! reverse as sell-news. High-impact headlines become the catalysts and
//! risk factors the decision stage quotes.
//!
//! A live deployment would plug a real headline source in at
//! construction; the default wire carries a plausible sample day.

use crate::market::require_market;
use crate::report::{NewsCall, NewsReport, Polarity, Tier};
use crate::section;
use async_trait::async_trait;
use delphi_core::RunState;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde::{Deserialize, Serialize};
use serde_json::to_value;

/// One headline on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub sentiment: Polarity,
    pub impact: Tier,
}

impl NewsItem {
    pub fn new(headline: impl Into<String>, sentiment: Polarity, impact: Tier) -> Self {
        Self {
            headline: headline.into(),
            sentiment,
            impact,
        }
    }
}

pub struct NewsTask {
    items: Vec<NewsItem>,
}

impl NewsTask {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }

    /// Sample wire for offline runs, headlines templated on the symbol
    pub fn with_sample_wire(symbol: &str) -> Self {
        let wire = [
            (
                format!("{symbol} Reports Strong Q3 Earnings Beat"),
                Polarity::Positive,
                Tier::High,
            ),
            (
                format!("Analyst Upgrades {symbol} Rating"),
                Polarity::Positive,
                Tier::Medium,
            ),
            (
                format!("New Regulations May Impact {symbol}"),
                Polarity::Negative,
                Tier::High,
            ),
            (
                format!("{symbol} Unveils New Product Line"),
                Polarity::Positive,
                Tier::Medium,
            ),
            (format!("{symbol} Market Update"), Polarity::Neutral, Tier::Low),
            (
                format!("{symbol} Industry News"),
                Polarity::Neutral,
                Tier::Low,
            ),
        ];
        Self::new(
            wire.into_iter()
                .map(|(headline, sentiment, impact)| NewsItem {
                    headline,
                    sentiment,
                    impact,
                })
                .collect(),
        )
    }
}

#[async_trait]
impl AnalysisTask for NewsTask {
    fn name(&self) -> &str {
        "news"
    }

    fn section(&self) -> &str {
        section::NEWS
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        // Market data is only needed to tie the report to the subject,
        // but a run without it should not pretend the wire was read.
        let market = require_market(state)?;
        if self.items.is_empty() {
            return Err(TaskError::UnusableData("empty news wire".to_string()));
        }

        let positive = count(&self.items, Polarity::Positive);
        let negative = count(&self.items, Polarity::Negative);

        let (overall_sentiment, impact_score, recommendation) = if positive > negative {
            (Polarity::Positive, 0.7, NewsCall::BuyNews)
        } else if negative > positive {
            (Polarity::Negative, 0.3, NewsCall::SellNews)
        } else {
            (Polarity::Neutral, 0.5, NewsCall::Hold)
        };

        let mut key_catalysts: Vec<String> = self
            .items
            .iter()
            .filter(|n| n.sentiment == Polarity::Positive && n.impact == Tier::High)
            .map(|n| n.headline.clone())
            .collect();
        let mut risk_factors: Vec<String> = self
            .items
            .iter()
            .filter(|n| n.sentiment == Polarity::Negative && n.impact == Tier::High)
            .map(|n| n.headline.clone())
            .collect();
        if key_catalysts.is_empty() {
            key_catalysts = vec![
                "Earnings potential".to_string(),
                "Market expansion".to_string(),
            ];
        }
        if risk_factors.is_empty() {
            risk_factors = vec![
                "Market volatility".to_string(),
                "Competitive pressure".to_string(),
            ];
        }
        key_catalysts.truncate(3);
        risk_factors.truncate(3);

        let most_impactful = self
            .items
            .iter()
            .find(|n| n.impact == Tier::High)
            .unwrap_or(&self.items[0])
            .headline
            .clone();

        let report = NewsReport {
            overall_sentiment,
            impact_score,
            key_catalysts,
            risk_factors,
            most_impactful,
            recommendation,
            confidence: 75,
        };

        let value = to_value(&report)
            .map_err(|e| TaskError::UnusableData(e.to_string()))?;
        Ok(TaskOutput::new(value).with_log(format!(
            "news: {} headlines for {}, {:?} ({} positive / {} negative)",
            self.items.len(),
            market.symbol,
            overall_sentiment,
            positive,
            negative,
        )))
    }
}

fn count(items: &[NewsItem], sentiment: Polarity) -> usize {
    items.iter().filter(|n| n.sentiment == sentiment).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{market_with_closes, state_with_market};

    fn state() -> RunState {
        state_with_market(&market_with_closes(&[2450.75]))
    }

    #[tokio::test]
    async fn test_positive_wire_is_buy_news() {
        let task = NewsTask::with_sample_wire("RELIANCE");
        let output = task.run(&state()).await.unwrap();
        let report: NewsReport = serde_json::from_value(output.value).unwrap();

        assert_eq!(report.overall_sentiment, Polarity::Positive);
        assert_eq!(report.recommendation, NewsCall::BuyNews);
        assert_eq!(
            report.key_catalysts,
            vec!["RELIANCE Reports Strong Q3 Earnings Beat"]
        );
        assert_eq!(
            report.risk_factors,
            vec!["New Regulations May Impact RELIANCE"]
        );
        assert_eq!(report.most_impactful, "RELIANCE Reports Strong Q3 Earnings Beat");
    }

    #[tokio::test]
    async fn test_negative_majority_is_sell_news() {
        let task = NewsTask::new(vec![
            NewsItem::new("Regulator opens probe", Polarity::Negative, Tier::High),
            NewsItem::new("Guidance cut", Polarity::Negative, Tier::Medium),
            NewsItem::new("Sector update", Polarity::Neutral, Tier::Low),
        ]);
        let output = task.run(&state()).await.unwrap();
        let report: NewsReport = serde_json::from_value(output.value).unwrap();

        assert_eq!(report.recommendation, NewsCall::SellNews);
        assert_eq!(report.impact_score, 0.3);
        // No high-impact positives, fallback catalysts kick in.
        assert_eq!(report.key_catalysts.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_wire_is_unusable() {
        let task = NewsTask::new(vec![]);
        assert!(matches!(
            task.run(&state()).await,
            Err(TaskError::UnusableData(_))
        ));
    }

    #[tokio::test]
    async fn test_balanced_wire_holds() {
        let task = NewsTask::new(vec![
            NewsItem::new("Earnings beat", Polarity::Positive, Tier::Medium),
            NewsItem::new("Margin pressure", Polarity::Negative, Tier::Medium),
        ]);
        let output = task.run(&state()).await.unwrap();
        let report: NewsReport = serde_json::from_value(output.value).unwrap();
        assert_eq!(report.recommendation, NewsCall::Hold);
        assert_eq!(report.overall_sentiment, Polarity::Neutral);
    }
}
