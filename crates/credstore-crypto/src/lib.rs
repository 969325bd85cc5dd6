//! Password hashing primitives
//!
//! `generate_salt` — fresh random salt, one per stored credential.
//!
//! `derive_hash` — PBKDF2-HMAC-SHA256, derives the 32-byte hash that is
//!   persisted in place of the password.
//!
//! `constant_time_eq` — comparison whose running time does not depend on
//!   where the inputs first differ.
//!
//! No I/O, no storage. The iteration count is a caller-supplied work factor;
//! the store records it next to each hash so the default can be raised for
//! new writes without invalidating old records.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Salt length in bytes. Stored verbatim beside the hash (not secret).
pub const SALT_LEN: usize = 16;

/// Derived hash length in bytes (SHA-256 output size).
pub const HASH_LEN: usize = 32;

/// Default PBKDF2 work factor for new writes.
/// High enough to slow brute-force search while staying fast for a single
/// interactive verification.
pub const DEFAULT_ITERATIONS: u32 = 390_000;

/// Generate a fresh random salt (call once per write; never reuse).
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a fixed-length hash from a password, salt and iteration count.
/// Deterministic in all three inputs.
pub fn derive_hash(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}

/// Constant-time byte comparison.
///
/// Length is public information, so a length mismatch returns false
/// immediately; equal-length inputs are compared without early exit.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps the test suite fast; the work factor does
    // not change any of the properties under test.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn derivation_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = derive_hash(b"s3cr3t", &salt, TEST_ITERATIONS);
        let b = derive_hash(b"s3cr3t", &salt, TEST_ITERATIONS);
        assert_eq!(a, b);
    }

    #[test]
    fn changing_any_input_changes_the_hash() {
        let salt = [7u8; SALT_LEN];
        let base = derive_hash(b"s3cr3t", &salt, TEST_ITERATIONS);
        assert_ne!(base, derive_hash(b"s3cr3u", &salt, TEST_ITERATIONS));
        assert_ne!(base, derive_hash(b"s3cr3t", &[8u8; SALT_LEN], TEST_ITERATIONS));
        assert_ne!(base, derive_hash(b"s3cr3t", &salt, TEST_ITERATIONS + 1));
    }

    #[test]
    fn salts_are_not_reused() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn constant_time_eq_matches_equality() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
