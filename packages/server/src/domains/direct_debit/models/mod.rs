pub mod mandate;
pub mod payment;
pub mod redirect_flow;
pub mod session_token;

pub use mandate::*;
pub use payment::*;
pub use redirect_flow::*;
pub use session_token::*;
