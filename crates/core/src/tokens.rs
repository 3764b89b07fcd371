//! Service-token generation and fingerprinting.
//!
//! Service profiles carry two long-lived opaque credentials: the API key a
//! smartCARS client presents as its session value, and a secondary ACARS
//! token for bridge integrations. Both are generated here.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of every generated service token (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// Hex characters of the sha256 digest kept when fingerprinting a secret.
const FINGERPRINT_LENGTH: usize = 12;

/// Generate a random alphanumeric service token of [`TOKEN_LENGTH`].
pub fn generate_service_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Short sha256-based fingerprint of a secret, safe for logs and the
/// request ring buffer. The secret itself must never be recorded.
pub fn fingerprint(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LENGTH].to_string()
}
