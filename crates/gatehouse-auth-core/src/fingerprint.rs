//! Refresh-token fingerprints
//!
//! Sessions never store the raw refresh token at rest; they keep a
//! SHA-256 fingerprint and match on that.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compute the non-reversible fingerprint of a token.
///
/// SHA-256, hex-encoded: 64 characters.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a raw token against a stored fingerprint in constant time.
pub fn fingerprint_matches(token: &str, stored: &str) -> bool {
    let computed = fingerprint(token);
    computed.as_bytes().ct_eq(stored.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let token = "some-refresh-token-value";
        assert_eq!(fingerprint(token), fingerprint(token));
    }

    #[test]
    fn test_fingerprint_distinct() {
        assert_ne!(fingerprint("token-a"), fingerprint("token-b"));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = fingerprint("test");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_matches() {
        let token = "token-123";
        let stored = fingerprint(token);
        assert!(fingerprint_matches(token, &stored));
        assert!(!fingerprint_matches("other-token", &stored));
    }

    #[test]
    fn test_fingerprint_matches_empty() {
        let stored = fingerprint("");
        assert!(fingerprint_matches("", &stored));
        assert!(!fingerprint_matches("non-empty", &stored));
    }
}
