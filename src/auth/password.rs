//! Salted password digests
//!
//! Stored form is `salt$digest`, both hex: a random 16-byte salt and the
//! SHA-256 of salt bytes followed by the password bytes. Verification
//! recomputes the digest and compares.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let salt_hex = to_hex(&salt);
    let digest = digest_hex(&salt, password);
    format!("{salt_hex}${digest}")
}

/// Check a password against a stored `salt$digest` value.
///
/// Unparseable stored values verify as false rather than erroring — a
/// corrupt row must never let a login through.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    let Some(salt) = from_hex(salt_hex) else {
        return false;
    };
    digest_hex(&salt, password) == expected
}

fn digest_hex(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let stored = hash_password("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("hunter22");
        let b = hash_password("hunter22");
        assert_ne!(a, b);
        assert!(verify_password("hunter22", &a));
        assert!(verify_password("hunter22", &b));
    }

    #[test]
    fn test_corrupt_stored_value_never_verifies() {
        assert!(!verify_password("hunter22", "no-dollar-sign"));
        assert!(!verify_password("hunter22", "nothex$deadbeef"));
        assert!(!verify_password("hunter22", "abc$deadbeef")); // odd-length salt
        assert!(!verify_password("hunter22", ""));
    }
}
