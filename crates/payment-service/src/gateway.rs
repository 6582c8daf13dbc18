//! Settlement gateway seam.
//!
//! The contract is submit-and-wait: one call carries the charge out and
//! brings the outcome back, never a later callback. A real processor
//! adapter would implement [`SettlementGateway`] over its API; the
//! default here is a coin flip so the workflow runs with no external
//! dependency.

use async_trait::async_trait;
use common::OrderId;
use rust_decimal::Decimal;

/// What the processor said about a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Approved,
    Declined,
}

/// Decides whether a charge settles.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    async fn settle(&self, order_id: &OrderId, amount: Decimal) -> SettlementOutcome;
}

/// Fixed-probability gateway. Approves with the configured rate; a rate
/// of 1.0 or 0.0 makes it deterministic, which the tests rely on.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    success_rate: f64,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64) -> Self {
        Self { success_rate }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self { success_rate: 0.95 }
    }
}

#[async_trait]
impl SettlementGateway for SimulatedGateway {
    async fn settle(&self, order_id: &OrderId, amount: Decimal) -> SettlementOutcome {
        // random::<f64>() samples [0, 1), so 1.0 always approves and
        // 0.0 never does.
        if rand::random::<f64>() < self.success_rate {
            SettlementOutcome::Approved
        } else {
            tracing::debug!(%order_id, %amount, "simulated gateway declined charge");
            SettlementOutcome::Declined
        }
    }
}
