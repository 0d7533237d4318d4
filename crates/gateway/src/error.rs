//! Error types for the gateway crate

use thiserror::Error;

/// Gateway-level errors (port operations)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Empty history for '{symbol}'")]
    EmptyHistory { symbol: String },

    #[error("Order rejected: {0}")]
    Rejected(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
