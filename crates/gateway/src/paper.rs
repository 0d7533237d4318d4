//! Paper broker - records orders instead of routing them
//!
//! Every accepted order gets a fabricated id and a `Simulated` receipt.
//! The recorded order book is exposed for inspection so tests and the
//! run summary can verify what the decision stage would have sent.

use crate::error::{GatewayError, GatewayResult};
use crate::ports::OrderGateway;
use async_trait::async_trait;
use delphi_core::{OrderReceipt, OrderRequest, OrderStatus};
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory order sink
pub struct PaperBroker {
    orders: Mutex<Vec<OrderRequest>>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Orders accepted so far, in placement order
    pub fn placed(&self) -> Vec<OrderRequest> {
        match self.orders.lock() {
            Ok(orders) => orders.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderGateway for PaperBroker {
    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderReceipt> {
        if request.quantity == 0 {
            return Err(GatewayError::Rejected("zero quantity".to_string()));
        }
        if request.price <= 0.0 {
            return Err(GatewayError::Rejected(format!(
                "non-positive price {}",
                request.price
            )));
        }

        let order_id = format!("PAPER-{}", Uuid::new_v4().simple());
        log::info!(
            "paper order {}: {} {} x {} @ {:.2}",
            order_id,
            request.side,
            request.symbol,
            request.quantity,
            request.price,
        );

        self.orders
            .lock()
            .map_err(|_| GatewayError::Rejected("order book poisoned".to_string()))?
            .push(request.clone());

        Ok(OrderReceipt {
            order_id,
            status: OrderStatus::Simulated,
        })
    }
}
