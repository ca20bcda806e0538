//! Delivery signatures sent by the CFTools (Hephaistos) webhook API.
//!
//! The signature is `hex(sha256(delivery_id || secret))`. This is not an
//! HMAC, and the comparison below is a plain string compare (not constant
//! time). Both match what the sender produces, so they must stay as-is for
//! interop.

use sha2::{Digest, Sha256};

/// Outcome of checking a delivery signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authentic,
    Forged,
}

/// Compute the expected signature for a delivery
pub fn compute_signature(delivery_id: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(delivery_id.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a claimed signature against the shared secret
pub fn verify_signature(secret: &str, delivery_id: &str, claimed: &str) -> Verdict {
    if compute_signature(delivery_id, secret) == claimed {
        Verdict::Authentic
    } else {
        Verdict::Forged
    }
}
