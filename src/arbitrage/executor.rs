//! Two-leg execution of a selected opportunity.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::market::Exchange;
use crate::metrics;
use crate::trading::{OrderRequest, Side};

use super::selector::Opportunity;

/// What happened to one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegOutcome {
    /// Order accepted; id when the exchange reported one.
    Submitted { order_id: Option<String> },
    /// Order rejected or the submission failed.
    Failed { reason: String },
}

impl LegOutcome {
    /// Whether this leg was accepted.
    pub fn is_submitted(&self) -> bool {
        matches!(self, LegOutcome::Submitted { .. })
    }
}

/// Outcome of executing both legs of an opportunity.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// The opportunity that was executed.
    pub opportunity: Opportunity,
    /// Yes-leg outcome.
    pub yes_leg: LegOutcome,
    /// No-leg outcome.
    pub no_leg: LegOutcome,
}

impl ExecutionReport {
    /// Both legs accepted.
    pub fn is_complete(&self) -> bool {
        self.yes_leg.is_submitted() && self.no_leg.is_submitted()
    }

    /// Exactly one leg accepted. This is the dangerous case: the account
    /// holds an unhedged contract.
    pub fn is_one_sided(&self) -> bool {
        self.yes_leg.is_submitted() != self.no_leg.is_submitted()
    }
}

/// Running totals for the status endpoint.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct ExecutorStats {
    /// Opportunities handed to the executor.
    pub executions: u64,
    /// Executions where both legs were accepted.
    pub complete: u64,
    /// Executions where exactly one leg was accepted.
    pub one_sided: u64,
    /// Executions where neither leg was accepted.
    pub failed: u64,
}

impl ExecutorStats {
    fn record(&mut self, report: &ExecutionReport) {
        self.executions += 1;
        if report.is_complete() {
            self.complete += 1;
        } else if report.is_one_sided() {
            self.one_sided += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Submits the two legs of an opportunity as limit orders.
///
/// The legs are not atomic: the yes leg goes first, then after a short
/// delay the no leg is attempted regardless of how the yes leg fared.
/// There is no rollback; one-sided outcomes are reported to the caller,
/// whose policy decides what to do about them.
#[derive(Debug)]
pub struct ArbExecutor {
    contract_count: i64,
    leg_delay: Duration,
    stats: ExecutorStats,
}

impl ArbExecutor {
    pub fn new(contract_count: i64, leg_delay: Duration) -> Self {
        Self {
            contract_count,
            leg_delay,
            stats: ExecutorStats::default(),
        }
    }

    /// Snapshot of the running totals.
    pub fn stats(&self) -> ExecutorStats {
        self.stats
    }

    /// Execute both legs, always attempting the second.
    pub async fn execute<E: Exchange>(
        &mut self,
        exchange: &E,
        opportunity: Opportunity,
    ) -> ExecutionReport {
        info!(
            ticker = %opportunity.ticker,
            action = %opportunity.action,
            yes_price = opportunity.yes_price,
            no_price = opportunity.no_price,
            profit_cents = opportunity.profit_cents,
            count = self.contract_count,
            "executing opportunity"
        );

        let yes_leg = self
            .submit_leg(exchange, &opportunity, Side::Yes, opportunity.yes_price)
            .await;

        tokio::time::sleep(self.leg_delay).await;

        let no_leg = self
            .submit_leg(exchange, &opportunity, Side::No, opportunity.no_price)
            .await;

        let report = ExecutionReport {
            opportunity,
            yes_leg,
            no_leg,
        };

        self.stats.record(&report);
        metrics::inc_opportunities_executed();

        if report.is_complete() {
            info!(
                ticker = %report.opportunity.ticker,
                profit_cents = report.opportunity.profit_cents,
                "both legs submitted"
            );
        } else if report.is_one_sided() {
            metrics::inc_one_sided_executions();
            error!(
                ticker = %report.opportunity.ticker,
                yes = ?report.yes_leg,
                no = ?report.no_leg,
                "one-sided execution, account holds an unhedged leg"
            );
        } else {
            warn!(ticker = %report.opportunity.ticker, "both legs failed");
        }

        report
    }

    async fn submit_leg<E: Exchange>(
        &self,
        exchange: &E,
        opportunity: &Opportunity,
        side: Side,
        price_cents: i64,
    ) -> LegOutcome {
        let order = OrderRequest::limit(
            opportunity.ticker.clone(),
            opportunity.action,
            side,
            self.contract_count,
            price_cents,
        );

        if let Err(problem) = order.validate() {
            warn!(side = %side, %problem, "refusing invalid leg");
            return LegOutcome::Failed { reason: problem };
        }

        match exchange.submit_order(&order).await {
            Ok(confirmation) => {
                let order_id = confirmation.order_id().map(str::to_string);
                info!(side = %side, order_id = ?order_id, "leg submitted");
                LegOutcome::Submitted { order_id }
            }
            Err(e) => {
                warn!(side = %side, error = %e, "leg submission failed");
                LegOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
