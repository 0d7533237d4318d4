//! Port traits for external market access
//!
//! Analysis tasks depend on these traits, never on a concrete adapter,
//! so a run can be wired against sample data, a paper broker or a live
//! connection without touching the tasks.

use crate::error::GatewayResult;
use async_trait::async_trait;
use delphi_core::{Interval, OrderReceipt, OrderRequest, PriceSeries, Quote};

/// Source of quotes and historical bars
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current snapshot for one instrument
    async fn quote(&self, symbol: &str) -> GatewayResult<Quote>;

    /// Historical bars covering the trailing `days`, oldest first
    async fn history(
        &self,
        symbol: &str,
        interval: Interval,
        days: u32,
    ) -> GatewayResult<PriceSeries>;
}

/// Order placement endpoint
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit one order; a rejection is an error, not a receipt
    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderReceipt>;
}
