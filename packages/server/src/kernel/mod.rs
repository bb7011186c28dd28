//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GoCardlessAdapter, RedirectSettings, ServerDeps, CONFIRM_REDIRECT_FLOW_PATH};
pub use test_dependencies::{
    MockFlowStatus, MockPaymentProcessor, ProcessorCall, MOCK_REDIRECT_BASE,
};
pub use traits::*;
