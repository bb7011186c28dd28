//! Direct debit domain - mandate setup via hosted redirect flows
//!
//! Round trip:
//!   start_redirect_flow → customer fills in the hosted form → processor redirects back
//!   → confirm_redirect_flow → mandate → create_payment (optional, any time later)
//!
//! Responsibilities:
//! - Session token generation and validation of caller input
//! - Forwarding to the payment processor (no retries, no local state)
//! - Idempotency keys for payment creation

pub mod actions;
pub mod errors;
pub mod models;

pub use actions::{confirm_redirect_flow, create_payment, start_redirect_flow};
pub use errors::DirectDebitError;
pub use models::*;
