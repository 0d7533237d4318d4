//! Trade execution task
//!
//! The only task with a side effect. It places at most one order per
//! run, and only when the decision is actionable, the risk stage
//! approved it and a position was actually sized. Every other path
//! records a skipped execution with the reason.

use crate::report::{Action, Approval, DecisionReport, ExecutionReport, RiskReport};
use crate::section;
use async_trait::async_trait;
use delphi_core::{OrderRequest, OrderSide, RunState};
use delphi_gateway::OrderGateway;
use delphi_pipeline::{AnalysisTask, TaskError, TaskOutput, TaskResult};
use serde_json::to_value;
use std::sync::Arc;

pub struct ExecutionTask {
    broker: Arc<dyn OrderGateway>,
}

impl ExecutionTask {
    pub fn new(broker: Arc<dyn OrderGateway>) -> Self {
        Self { broker }
    }
}

fn emit(report: &ExecutionReport, log: String) -> TaskResult {
    let value = to_value(report).map_err(|e| TaskError::UnusableData(e.to_string()))?;
    Ok(TaskOutput::new(value).with_log(log))
}

#[async_trait]
impl AnalysisTask for ExecutionTask {
    fn name(&self) -> &str {
        "trade_execution"
    }

    fn section(&self) -> &str {
        section::EXECUTION
    }

    async fn run(&self, state: &RunState) -> TaskResult {
        let Some(decision) = state.section_as::<DecisionReport>(section::DECISION) else {
            let report = ExecutionReport::skipped("no decision available");
            return emit(&report, "trade_execution: skipped, no decision".to_string());
        };
        let risk = state.section_as::<RiskReport>(section::RISK);
        let approval = risk.as_ref().map(|r| r.approval).unwrap_or(Approval::Rejected);

        let side = match decision.action {
            Action::Buy => OrderSide::Buy,
            Action::Sell => OrderSide::Sell,
            Action::Hold => {
                let report = ExecutionReport::skipped("decision is HOLD");
                return emit(&report, "trade_execution: skipped, HOLD".to_string());
            }
        };
        if approval != Approval::Approved {
            let report =
                ExecutionReport::skipped(format!("risk approval is {approval:?}"));
            return emit(
                &report,
                format!("trade_execution: skipped, approval {approval:?}"),
            );
        }

        let shares = risk.map(|r| r.position.shares).unwrap_or(0);
        if shares == 0 {
            let report = ExecutionReport::skipped("zero position size");
            return emit(
                &report,
                "trade_execution: skipped, zero position size".to_string(),
            );
        }

        let request = OrderRequest {
            symbol: state.subject.clone(),
            side,
            quantity: shares,
            price: decision.entry_price,
        };
        match self.broker.place_order(&request).await {
            Ok(receipt) => {
                let report = ExecutionReport {
                    executed: true,
                    order_id: Some(receipt.order_id.clone()),
                    price: request.price,
                    quantity: request.quantity,
                    note: format!("{:?} via paper broker", receipt.status),
                };
                emit(
                    &report,
                    format!(
                        "trade_execution: {} {} x {} @ {:.2}, order {}",
                        side, request.symbol, request.quantity, request.price, receipt.order_id,
                    ),
                )
            }
            Err(err) => {
                log::warn!("order rejected by broker: {err}");
                let report = ExecutionReport::skipped(format!("broker rejected: {err}"));
                emit(&report, format!("trade_execution: rejected, {err}"))
            }
        }
    }
}
