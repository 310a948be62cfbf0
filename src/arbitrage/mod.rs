//! Arbitrage scanning and execution.
//!
//! A binary market's yes and no contracts settle to exactly 100 cents
//! between them, so any quote pair summing to something else is free
//! money (before fees): buy both sides when the asks sum under 100,
//! sell both when the bids sum over 100.

pub mod executor;
pub mod selector;

pub use executor::{ArbExecutor, ExecutionReport, ExecutorStats, LegOutcome};
pub use selector::{select_best, Opportunity, PAYOUT_CENTS};
