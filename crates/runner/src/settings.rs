//! Environment-driven configuration
//!
//! Every knob has a default so an offline run needs no environment at
//! all. Values are parsed and validated once at startup; a malformed
//! variable is a hard error rather than a silent fallback.

use delphi_core::Interval;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },

    #[error("{0}")]
    Constraint(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub target_symbol: String,
    pub interval: Interval,
    pub lookback_days: u32,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Fraction of the account risked per trade
    pub max_position_size: f64,
    pub stop_loss_percent: f64,
    pub account_balance: f64,
    /// Fixed feed seed for repeatable sample-data runs
    pub feed_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_symbol: "RELIANCE".to_string(),
            interval: Interval::Minute15,
            lookback_days: 30,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            max_position_size: 0.02,
            stop_loss_percent: 0.05,
            account_balance: 100_000.0,
            feed_seed: None,
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, SettingsError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| SettingsError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

impl Settings {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let settings = Self {
            target_symbol: std::env::var("TARGET_SYMBOL").unwrap_or(defaults.target_symbol),
            interval: parse_var("INTERVAL")?.unwrap_or(defaults.interval),
            lookback_days: parse_var("LOOKBACK_DAYS")?.unwrap_or(defaults.lookback_days),
            rsi_period: parse_var("RSI_PERIOD")?.unwrap_or(defaults.rsi_period),
            rsi_overbought: parse_var("RSI_OVERBOUGHT")?.unwrap_or(defaults.rsi_overbought),
            rsi_oversold: parse_var("RSI_OVERSOLD")?.unwrap_or(defaults.rsi_oversold),
            max_position_size: parse_var("MAX_POSITION_SIZE")?
                .unwrap_or(defaults.max_position_size),
            stop_loss_percent: parse_var("STOP_LOSS_PERCENT")?
                .unwrap_or(defaults.stop_loss_percent),
            account_balance: parse_var("ACCOUNT_BALANCE")?.unwrap_or(defaults.account_balance),
            feed_seed: parse_var("FEED_SEED")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.target_symbol.is_empty() {
            return Err(SettingsError::Constraint(
                "TARGET_SYMBOL must not be empty".to_string(),
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(SettingsError::Constraint(format!(
                "RSI_OVERSOLD ({}) must be below RSI_OVERBOUGHT ({})",
                self.rsi_oversold, self.rsi_overbought,
            )));
        }
        if self.lookback_days == 0 {
            return Err(SettingsError::Constraint(
                "LOOKBACK_DAYS must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.stop_loss_percent) || self.stop_loss_percent == 0.0 {
            return Err(SettingsError::Constraint(format!(
                "STOP_LOSS_PERCENT must be in (0, 1), got {}",
                self.stop_loss_percent,
            )));
        }
        if self.max_position_size <= 0.0 || self.max_position_size > 1.0 {
            return Err(SettingsError::Constraint(format!(
                "MAX_POSITION_SIZE must be in (0, 1], got {}",
                self.max_position_size,
            )));
        }
        Ok(())
    }
}
