use sha2::{Digest, Sha256};

/// API token keys are never stored; lookups go through this digest.
pub fn token_digest(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}
