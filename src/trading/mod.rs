//! Trading module for order construction and the position guard.
//!
//! This module handles:
//! - Order types and limit-order request bodies
//! - The at-most-one-position guard

pub mod order;
pub mod position;

pub use order::{Action, ConfirmedOrder, OrderConfirmation, OrderRequest, Side};
pub use position::has_open_position;
