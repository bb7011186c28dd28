// HTTP middleware
pub mod ip_extractor;
pub mod rate_limit;

pub use ip_extractor::*;
pub use rate_limit::*;
