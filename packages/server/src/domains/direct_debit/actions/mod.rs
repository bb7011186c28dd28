//! Direct debit actions - business logic functions
//!
//! Actions are async functions called directly from the HTTP handlers.
//! Each validates its input, makes exactly one processor call and returns the result.

mod confirm_redirect_flow;
mod create_payment;
mod start_redirect_flow;

pub use confirm_redirect_flow::confirm_redirect_flow;
pub use create_payment::create_payment;
pub use start_redirect_flow::start_redirect_flow;
