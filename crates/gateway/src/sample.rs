//! Sample market data feed
//!
//! Generates plausible quotes and bar histories from a seeded random
//! walk, so full analysis runs work offline and tests are repeatable.
//! Prices anchor on a fixed per-symbol base table; unknown symbols fall
//! back to a 1000.0 base rather than failing, matching how a sandbox
//! feed behaves for unlisted instruments.

use crate::error::{GatewayError, GatewayResult};
use crate::ports::MarketData;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use delphi_core::{Bar, Interval, PriceSeries, Quote};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Anchor prices for the sampled universe
const BASE_PRICES: &[(&str, f64)] = &[
    ("RELIANCE", 2450.75),
    ("TCS", 3280.50),
    ("INFY", 1645.25),
    ("HDFCBANK", 1510.80),
    ("ICICIBANK", 1125.40),
    ("SBIN", 805.20),
    ("BHARTIARTL", 1185.65),
    ("ITC", 415.30),
    ("HINDUNILVR", 2380.90),
    ("KOTAKBANK", 1720.15),
];

const DEFAULT_BASE_PRICE: f64 = 1000.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Seeded pseudo-random market data source
pub struct SampleFeed {
    rng: Mutex<StdRng>,
}

impl SampleFeed {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fixed seed for repeatable runs and tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn base_price(symbol: &str) -> f64 {
        BASE_PRICES
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, price)| *price)
            .unwrap_or(DEFAULT_BASE_PRICE)
    }

    fn lock_rng(&self) -> GatewayResult<std::sync::MutexGuard<'_, StdRng>> {
        self.rng
            .lock()
            .map_err(|_| GatewayError::Feed("sample rng poisoned".to_string()))
    }
}

impl Default for SampleFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for SampleFeed {
    async fn quote(&self, symbol: &str) -> GatewayResult<Quote> {
        if symbol.is_empty() {
            return Err(GatewayError::Feed("empty symbol".to_string()));
        }
        let base = Self::base_price(symbol);
        let mut rng = self.lock_rng()?;

        // Last price within +/- 2% of the anchor, OHLC wrapped around it
        let last_price = base * (1.0 + rng.gen_range(-0.02..0.02));
        let high = last_price * rng.gen_range(1.001..1.015);
        let low = last_price * rng.gen_range(0.985..0.999);
        let open = last_price * rng.gen_range(0.995..1.005);
        let volume = rng.gen_range(500_000..=2_000_000) as f64;

        log::debug!("sample quote for {}: {:.2}", symbol, last_price);

        Ok(Quote {
            symbol: symbol.to_string(),
            last_price: round2(last_price),
            volume,
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close: round2(last_price),
            timestamp: Utc::now(),
        })
    }

    async fn history(
        &self,
        symbol: &str,
        interval: Interval,
        days: u32,
    ) -> GatewayResult<PriceSeries> {
        if days == 0 {
            return Err(GatewayError::EmptyHistory {
                symbol: symbol.to_string(),
            });
        }
        let base = Self::base_price(symbol);
        let total_points = days as usize * interval.bars_per_day();
        let start = Utc::now() - Duration::days(i64::from(days));
        let mut rng = self.lock_rng()?;

        // Random walk from the anchor with a slight upward bias
        let mut bars = Vec::with_capacity(total_points);
        let mut current = base;
        for i in 0..total_points {
            current *= 1.0 + rng.gen_range(-0.008..0.010);
            let high = current * rng.gen_range(1.001..1.008);
            let low = current * rng.gen_range(0.992..0.999);
            let open = current * rng.gen_range(0.998..1.002);
            let volume = rng.gen_range(10_000..=50_000) as f64;

            bars.push(Bar {
                timestamp: start + interval.step() * i as i32,
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(current),
                volume,
            });
        }

        log::debug!(
            "sample history for {}: {} bars at {}",
            symbol,
            bars.len(),
            interval.as_str(),
        );
        Ok(PriceSeries::new(bars))
    }
}
