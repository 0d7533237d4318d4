//! Indicator functions
//!
//! All inputs are ordered oldest first. Each function returns `None`
//! when the series is too short for the requested period; the minimum
//! sample size is `period` except where a differencing step needs one
//! extra bar (RSI, ATR).

use serde::{Deserialize, Serialize};

/// Bollinger band triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bollinger {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// MACD line plus derived signal and histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Stochastic oscillator pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stochastic {
    pub k: f64,
    pub d: f64,
}

/// Simple moving average: arithmetic mean of the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average.
///
/// Seeded with the first value and folded left-to-right over the
/// *entire* slice with `k = 2 / (period + 1)`; callers are responsible
/// for passing the correctly scoped slice.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[0];
    for price in &values[1..] {
        ema = price * k + ema * (1.0 - k);
    }
    Some(ema)
}

/// Relative strength index over the last `period` price deltas.
///
/// Returns exactly `100.0` when the average loss is zero (monotonic
/// rise), guarding the division.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len() - period..];

    let avg_gain = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let avg_loss = window.iter().filter(|d| **d < 0.0).map(|d| -d).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Bollinger bands: middle = SMA, band = `k` population standard
/// deviations of the last `period` closes.
pub fn bollinger(closes: &[f64], period: usize, k: f64) -> Option<Bollinger> {
    let middle = sma(closes, period)?;
    let window = &closes[closes.len() - period..];
    let variance =
        window.iter().map(|c| (c - middle) * (c - middle)).sum::<f64>() / period as f64;
    let band = k * variance.sqrt();
    Some(Bollinger {
        upper: middle + band,
        middle,
        lower: middle - band,
    })
}

/// MACD: `EMA(fast) - EMA(slow)`.
///
/// The signal line is a fixed fraction of the MACD line (0.9) and the
/// histogram the remainder (0.1), not an independent EMA of MACD
/// history. This reproduces the reference behavior exactly and is a
/// deliberate simplification of the textbook formula.
pub fn macd(closes: &[f64], fast: usize, slow: usize) -> Option<Macd> {
    if closes.len() < slow {
        return None;
    }
    let line = ema(closes, fast)? - ema(closes, slow)?;
    Some(Macd {
        line,
        signal: line * 0.9,
        histogram: line * 0.1,
    })
}

/// Stochastic oscillator over the last `period` bars.
///
/// `%K` is exactly `50.0` when the high-low range is zero. `%D` is a
/// fixed fraction of `%K` (0.9), not a rolling mean of `%K` history -
/// the same deliberate simplification as the MACD signal line.
pub fn stochastic(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<Stochastic> {
    if period == 0 || highs.len() < period || lows.len() < period || closes.len() < period {
        return None;
    }
    let highest = highs[highs.len() - period..]
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    let lowest = lows[lows.len() - period..]
        .iter()
        .cloned()
        .fold(f64::MAX, f64::min);
    let close = *closes.last()?;

    let k = if highest == lowest {
        50.0
    } else {
        (close - lowest) / (highest - lowest) * 100.0
    };
    Some(Stochastic { k, d: k * 0.9 })
}

/// Average true range: mean of the last `period` true ranges, where
/// `TR = max(high - low, |high - prev_close|, |low - prev_close|)`.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let len = highs.len().min(lows.len()).min(closes.len());
    if period == 0 || len < period + 1 {
        return None;
    }

    let mut true_ranges = Vec::with_capacity(len - 1);
    for i in 1..len {
        let high_low = highs[i] - lows[i];
        let high_close = (highs[i] - closes[i - 1]).abs();
        let low_close = (lows[i] - closes[i - 1]).abs();
        true_ranges.push(high_low.max(high_close).max(low_close));
    }

    let window = &true_ranges[true_ranges.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_sma_basic() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sma(&values, 3).unwrap() - 4.0).abs() < EPS);
        assert!((sma(&values, 5).unwrap() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_insufficient_data_is_none() {
        let short = [1.0, 2.0, 3.0];
        assert!(sma(&short, 4).is_none());
        assert!(ema(&short, 4).is_none());
        // RSI and ATR need one extra bar for differencing
        assert!(rsi(&short, 3).is_none());
        assert!(atr(&short, &short, &short, 3).is_none());
        assert!(bollinger(&short, 4, 2.0).is_none());
        assert!(macd(&short, 2, 4).is_none());
        assert!(stochastic(&short, &short, &short, 4).is_none());
    }

    #[test]
    fn test_zero_period_is_none() {
        let values = [1.0, 2.0, 3.0];
        assert!(sma(&values, 0).is_none());
        assert!(ema(&values, 0).is_none());
        assert!(rsi(&values, 0).is_none());
        assert!(stochastic(&values, &values, &values, 0).is_none());
        assert!(atr(&values, &values, &values, 0).is_none());
    }

    #[test]
    fn test_ema_matches_left_to_right_fold() {
        let values = [10.0, 11.0, 12.0, 13.0];
        let k = 2.0 / 4.0; // period 3
        let mut expected = 10.0;
        for v in &values[1..] {
            expected = v * k + expected * (1.0 - k);
        }
        assert!((ema(&values, 3).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_rsi_monotonic_rise_is_exactly_100() {
        // 60 closes rising linearly 100..159: zero average loss
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&closes, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_monotonic_fall_is_zero() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let value = rsi(&closes, 14).unwrap();
        assert!(value.abs() < EPS);
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // Alternating +1/-1 deltas: avg gain == avg loss, RSI = 50
        let closes: Vec<f64> = (0..31)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let value = rsi(&closes, 14).unwrap();
        assert!((value - 50.0).abs() < EPS);
    }

    #[test]
    fn test_bollinger_flat_series_has_zero_width() {
        let closes = [42.0; 25];
        let bands = bollinger(&closes, 20, 2.0).unwrap();
        assert!((bands.upper - bands.middle).abs() < EPS);
        assert!((bands.lower - bands.middle).abs() < EPS);
        assert!((bands.middle - 42.0).abs() < EPS);
    }

    #[test]
    fn test_bollinger_population_stddev() {
        // Window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population stddev 2
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger(&closes, 8, 2.0).unwrap();
        assert!((bands.middle - 5.0).abs() < EPS);
        assert!((bands.upper - 9.0).abs() < EPS);
        assert!((bands.lower - 1.0).abs() < EPS);
    }

    #[test]
    fn test_macd_fixed_fraction_signal() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let value = macd(&closes, 12, 26).unwrap();
        assert!((value.signal - value.line * 0.9).abs() < EPS);
        assert!((value.histogram - value.line * 0.1).abs() < EPS);
        // Rising series: fast EMA above slow EMA
        assert!(value.line > 0.0);
    }

    #[test]
    fn test_stochastic_zero_range_is_50() {
        let flat = [10.0; 20];
        let value = stochastic(&flat, &flat, &flat, 14).unwrap();
        assert!((value.k - 50.0).abs() < EPS);
        assert!((value.d - 45.0).abs() < EPS);
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let highs = [10.0, 11.0, 12.0, 13.0, 14.0];
        let lows = [9.0, 10.0, 11.0, 12.0, 13.0];
        let closes = [9.5, 10.5, 11.5, 12.5, 14.0];
        let value = stochastic(&highs, &lows, &closes, 5).unwrap();
        // Close equals the highest high: %K = 100
        assert!((value.k - 100.0).abs() < EPS);
    }

    #[test]
    fn test_atr_constant_range() {
        // Every bar: high-low = 2, no gaps between closes
        let highs: Vec<f64> = (0..20).map(|_| 102.0).collect();
        let lows: Vec<f64> = (0..20).map(|_| 100.0).collect();
        let closes: Vec<f64> = (0..20).map(|_| 101.0).collect();
        let value = atr(&highs, &lows, &closes, 14).unwrap();
        assert!((value - 2.0).abs() < EPS);
    }

    #[test]
    fn test_atr_gap_dominates_true_range() {
        // Previous close far below the bar: |high - prev_close| wins
        let highs = [10.0, 20.0];
        let lows = [9.0, 19.0];
        let closes = [9.5, 19.5];
        let value = atr(&highs, &lows, &closes, 1).unwrap();
        assert!((value - 10.5).abs() < EPS);
    }
}
