//! Market data primitives
//!
//! A `Bar` is one OHLCV sample; a `PriceSeries` is an ordered sequence of
//! bars, oldest first, as delivered by the market-data gateway. Both are
//! read-only to the pipeline: a fresh series is fetched per run.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered sequence of bars, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries(pub Vec<Bar>);

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self(bars)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.0
    }

    pub fn last(&self) -> Option<&Bar> {
        self.0.last()
    }

    /// Close prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.close).collect()
    }

    /// High prices, oldest first
    pub fn highs(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.high).collect()
    }

    /// Low prices, oldest first
    pub fn lows(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.low).collect()
    }

    /// Volumes, oldest first
    pub fn volumes(&self) -> Vec<f64> {
        self.0.iter().map(|b| b.volume).collect()
    }
}

/// Current market snapshot for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub last_price: f64,
    pub volume: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: DateTime<Utc>,
}

/// Bar interval for history requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Minute15,
    Hour1,
    Day1,
}

impl Interval {
    /// Bars produced per trading day at this interval
    pub fn bars_per_day(&self) -> usize {
        match self {
            Interval::Minute15 => 24 * 4,
            Interval::Hour1 => 24,
            Interval::Day1 => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute15 => "15minute",
            Interval::Hour1 => "1hour",
            Interval::Day1 => "1day",
        }
    }

    /// Duration of one bar
    pub fn step(&self) -> chrono::Duration {
        match self {
            Interval::Minute15 => chrono::Duration::minutes(15),
            Interval::Hour1 => chrono::Duration::hours(1),
            Interval::Day1 => chrono::Duration::days(1),
        }
    }
}

impl std::str::FromStr for Interval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15minute" => Ok(Interval::Minute15),
            "1hour" => Ok(Interval::Hour1),
            "1day" => Ok(Interval::Day1),
            other => Err(CoreError::UnknownInterval(other.to_string())),
        }
    }
}
