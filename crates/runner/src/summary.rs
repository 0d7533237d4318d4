//! Final run summary
//!
//! Logs the run record the way an analyst would read it back: one
//! block per section, skipping whatever a failed task left absent,
//! then the accumulated task log.

use delphi_analysts::report::{
    DecisionReport, ExecutionReport, FundamentalsReport, MarketReport, NewsReport,
    ResearchReport, RiskReport, SentimentReport, SignalReport, TechnicalReport,
};
use delphi_analysts::section;
use delphi_core::RunState;

pub fn log_run_summary(state: &RunState) {
    log::info!("=== ANALYSIS RUN RESULTS ===");
    log::info!("Run: {}", state.run_id);
    log::info!("Subject: {}", state.subject);
    log::info!("Phase: {:?}", state.phase);
    if let Some(reason) = &state.run_error {
        log::info!("Run error: {reason}");
    }

    if let Some(market) = state.section_as::<MarketReport>(section::MARKET) {
        log::info!("Current price: {:.2}", market.current_price);
        log::info!("Volume: {}", market.volume);
        log::info!("Trend: {:?}", market.trend);
    }
    if let Some(technical) = state.section_as::<TechnicalReport>(section::TECHNICAL) {
        match technical.indicators.rsi {
            Some(rsi) => log::info!("RSI: {rsi:.2}"),
            None => log::info!("RSI: n/a"),
        }
        log::info!("Technical score: {}", technical.overall_score);
    }
    if let Some(fundamentals) = state.section_as::<FundamentalsReport>(section::FUNDAMENTALS) {
        log::info!("Financial health: {:?}", fundamentals.financial_health);
        log::info!("Valuation: {:?}", fundamentals.valuation);
        log::info!("Price target: {:.2}", fundamentals.price_target);
    }
    if let Some(sentiment) = state.section_as::<SentimentReport>(section::SENTIMENT) {
        log::info!("Sentiment: {:?}", sentiment.overall_sentiment);
        log::info!("Sentiment score: {:.2}", sentiment.score);
    }
    if let Some(news) = state.section_as::<NewsReport>(section::NEWS) {
        log::info!("News sentiment: {:?}", news.overall_sentiment);
        log::info!("News call: {:?}", news.recommendation);
    }
    if let Some(bull) = state.section_as::<ResearchReport>(section::BULL) {
        log::info!("Bull case: {} ({})", bull.recommended_action, bull.move_potential);
    }
    if let Some(bear) = state.section_as::<ResearchReport>(section::BEAR) {
        log::info!("Bear case: {} ({})", bear.recommended_action, bear.move_potential);
    }
    if let Some(signal) = state.section_as::<SignalReport>(section::SIGNAL) {
        log::info!("Signal: {} (confidence {}%)", signal.signal, signal.confidence);
    }
    if let Some(risk) = state.section_as::<RiskReport>(section::RISK) {
        log::info!("Risk level: {:?}", risk.risk_level);
        log::info!("Trade approval: {:?}", risk.approval);
    }
    if let Some(decision) = state.section_as::<DecisionReport>(section::DECISION) {
        log::info!("Final decision: {}", decision.action);
        log::info!("Allocation: {}%", decision.position_percent);
        log::info!("Entry: {:.2}", decision.entry_price);
        log::info!("Risk-reward: {:.2}", decision.risk_reward_ratio);
    }
    if let Some(execution) = state.section_as::<ExecutionReport>(section::EXECUTION) {
        log::info!("Executed: {}", execution.executed);
        log::info!(
            "Order: {}",
            execution.order_id.as_deref().unwrap_or("none")
        );
    }

    log::info!("=== TASK LOG ===");
    for line in &state.log {
        log::info!("  {line}");
    }
    log::info!("=== END RESULTS ===");
}
