// HTTP routes
pub mod direct_debit;
pub mod health;

pub use direct_debit::*;
pub use health::*;
