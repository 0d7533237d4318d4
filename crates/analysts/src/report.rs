//! Typed section documents
//!
//! Every task serialises one of these into its section. The pipeline
//! never inspects the shape; consumers deserialise with
//! `RunState::section_as` and fall back to defaults when the document
//! is absent or has drifted.

use delphi_core::PriceSeries;
use delphi_indicators::IndicatorSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Oversold,
    Overbought,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valuation {
    Undervalued,
    FairlyValued,
    Overvalued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Implication {
    BuyMomentum,
    SellPressure,
    SidewaysAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCall {
    BuyNews,
    SellNews,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    ShortTerm,
    MediumTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approval {
    Approved,
    Conditional,
    Rejected,
}

/// Output of the ingest stage: current snapshot plus the bar history
/// every downstream analyst works from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub symbol: String,
    pub current_price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub trend: Trend,
    pub volatility: Tier,
    pub support_level: f64,
    pub resistance_level: f64,
    pub history: PriceSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub indicators: IndicatorSet,
    pub trend_direction: Trend,
    pub trend_strength: Strength,
    pub momentum: Momentum,
    pub rsi_zone: RsiZone,
    pub support_level: f64,
    pub resistance_level: f64,
    /// 0..=100, 50 is neutral
    pub overall_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsReport {
    pub financial_health: Strength,
    pub valuation: Valuation,
    pub growth_potential: Tier,
    pub price_target: f64,
    pub recommendation: Action,
    pub thesis: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub overall_sentiment: Trend,
    pub strength: Strength,
    /// 0.0 (bearish) to 1.0 (bullish)
    pub score: f64,
    pub social_media_buzz: Tier,
    pub implication: Implication,
    pub confidence: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsReport {
    pub overall_sentiment: Polarity,
    /// 0.0 to 1.0
    pub impact_score: f64,
    pub key_catalysts: Vec<String>,
    pub risk_factors: Vec<String>,
    pub most_impactful: String,
    pub recommendation: NewsCall,
    pub confidence: u8,
}

/// One side of the bull/bear debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub thesis: String,
    /// Expected move, e.g. "15-25%"
    pub move_potential: String,
    pub timeline: Timeline,
    pub key_points: Vec<String>,
    pub recommended_action: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub signal: Action,
    pub strength: Strength,
    /// 0..=100
    pub confidence: u8,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub ma_signal: Action,
    pub ma_strength: Strength,
    pub volume_confirmation: Strength,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizing {
    pub shares: u64,
    pub position_value: f64,
    pub risk_amount: f64,
    pub risk_per_share: f64,
}

impl PositionSizing {
    pub fn zero() -> Self {
        Self {
            shares: 0,
            position_value: 0.0,
            risk_amount: 0.0,
            risk_per_share: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// 0..=100, higher is riskier
    pub risk_score: i32,
    pub risk_level: RiskLevel,
    pub volatility: Tier,
    pub liquidity: Tier,
    pub gap: Tier,
    pub approval: Approval,
    pub position: PositionSizing,
    pub stop_loss_recommendation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub action: Action,
    /// Portfolio allocation in percent
    pub position_percent: f64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward_ratio: f64,
    pub buy_votes: usize,
    pub sell_votes: usize,
    pub hold_votes: usize,
    pub rationale: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub executed: bool,
    pub order_id: Option<String>,
    pub price: f64,
    pub quantity: u64,
    pub note: String,
}

impl ExecutionReport {
    /// The no-trade outcome, with the reason recorded
    pub fn skipped(note: impl Into<String>) -> Self {
        Self {
            executed: false,
            order_id: None,
            price: 0.0,
            quantity: 0,
            note: note.into(),
        }
    }
}
