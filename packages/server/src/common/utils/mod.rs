pub mod email;
pub mod idempotency_key;
pub mod processor_id;

pub use email::*;
pub use idempotency_key::*;
pub use processor_id::*;
