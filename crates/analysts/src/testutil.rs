//! Shared fixtures for the analyst task tests

use crate::report::{MarketReport, Tier, Trend};
use crate::section;
use chrono::{Duration, Utc};
use delphi_core::{Bar, PriceSeries, RunState};

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = Utc::now() - Duration::days(30);
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::minutes(15 * i as i64),
            open: close,
            high: close * 1.005,
            low: close * 0.995,
            close,
            volume: 20_000.0,
        })
        .collect();
    PriceSeries::new(bars)
}

pub fn market_with_closes(closes: &[f64]) -> MarketReport {
    let current = *closes.last().unwrap();
    MarketReport {
        symbol: "RELIANCE".to_string(),
        current_price: current,
        open: current,
        high: current * 1.01,
        low: current * 0.99,
        close: current,
        volume: 800_000.0,
        trend: Trend::Sideways,
        volatility: Tier::Medium,
        support_level: current * 0.99,
        resistance_level: current * 1.01,
        history: series_from_closes(closes),
    }
}

pub fn state_with_market(report: &MarketReport) -> RunState {
    let mut state = RunState::new(&report.symbol);
    state.insert_section(section::MARKET, serde_json::to_value(report).unwrap());
    state
}

pub fn insert<T: serde::Serialize>(state: &mut RunState, name: &str, report: &T) {
    state.insert_section(name, serde_json::to_value(report).unwrap());
}
