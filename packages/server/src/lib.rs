// Direct Debit Gateway - API Core
//
// Forwards mandate setup (GoCardless redirect flows) and one-off payment
// requests from the mobile app to the payment processor. The processor is the
// system of record; nothing is persisted here.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
