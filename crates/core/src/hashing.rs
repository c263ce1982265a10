//! One-way digest utilities for token and API key storage.
//!
//! Refresh tokens are stored as an HMAC-SHA256 digest keyed by a
//! server-held pepper, so a leaked table of hashes cannot be reversed or
//! matched against a rainbow table without the pepper. API keys use a
//! plain SHA-256 digest: their secrets are high-entropy random strings,
//! not password-like material.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Compute the peppered lookup digest of a raw refresh token.
///
/// Deterministic: the same token and pepper always yield the same digest,
/// so the store can be queried by equality without ever persisting the raw
/// value. Returns a 64-character lowercase hex string.
pub fn hash_refresh_token(raw_token: &str, pepper: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(pepper.as_bytes()).expect("HMAC accepts any key length");
    mac.update(raw_token.as_bytes());
    let result = mac.finalize();
    hex_encode(&result.into_bytes())
}

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_is_consistent() {
        let data = b"hello world";
        assert_eq!(sha256_hex(data), sha256_hex(data));
        assert_eq!(sha256_hex(data).len(), 64);
    }

    #[test]
    fn refresh_hash_is_deterministic() {
        let a = hash_refresh_token("some.jwt.token", "pepper");
        let b = hash_refresh_token("some.jwt.token", "pepper");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn refresh_hash_differs_with_different_pepper() {
        let a = hash_refresh_token("some.jwt.token", "pepper_a");
        let b = hash_refresh_token("some.jwt.token", "pepper_b");
        assert_ne!(a, b);
    }

    #[test]
    fn refresh_hash_differs_with_different_token() {
        let a = hash_refresh_token("token_a", "pepper");
        let b = hash_refresh_token("token_b", "pepper");
        assert_ne!(a, b);
    }

    #[test]
    fn refresh_hash_is_not_plain_sha256() {
        // The keyed digest must not degenerate into an unkeyed one.
        let keyed = hash_refresh_token("token", "pepper");
        let unkeyed = sha256_hex(b"peppertoken");
        assert_ne!(keyed, unkeyed);
    }
}
