//! Delphi Indicator Engine
//!
//! Deterministic numeric transforms over OHLCV price series:
//!
//! - **Moving averages**: SMA, EMA
//! - **Oscillators**: RSI, Stochastic, MACD
//! - **Volatility**: Bollinger bands, ATR
//!
//! Every function is pure, side-effect free, and safe to call
//! concurrently on disjoint data. Insufficient input is a typed
//! `None`, never an error: a series shorter than the requested period
//! (or `period + 1` where a differencing step is needed) yields no
//! value, and downstream consumers treat the indicator as absent.

pub mod engine;
pub mod set;

pub use engine::{
    Bollinger, Macd, Stochastic, atr, bollinger, ema, macd, rsi, sma, stochastic,
};
pub use set::{IndicatorConfig, IndicatorSet};
