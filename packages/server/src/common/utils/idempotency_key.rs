use sha2::{Digest, Sha256};

/// Derive the idempotency key for one logical payment intent.
///
/// The same (mandate, amount, currency, nonce) always yields the same key, so a
/// caller retrying a request with its original nonce cannot create a second
/// charge. Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` differ.
pub fn generate_idempotency_key(mandate_id: &str, amount: u64, currency: &str, nonce: &str) -> String {
    let amount = amount.to_string();
    let mut hasher = Sha256::new();
    for part in [mandate_id, amount.as_str(), currency, nonce] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
