use serde::{Deserialize, Serialize};

/// Authorisation to collect from a customer's bank account.
/// Produced only by a successful redirect flow confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandate {
    pub mandate_id: String,
    pub customer_id: String,
}
