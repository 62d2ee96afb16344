//! One-time codes for password reset.
//!
//! Only a salted SHA-256 of the code is ever stored, as `salt$digest`
//! with both halves hex encoded.

use rand::Rng;
use sha2::{Digest, Sha256};

/// How long a code stays valid
pub const CODE_TTL_MINUTES: i64 = 10;
/// Wrong guesses allowed before the ticket is burned
pub const MAX_ATTEMPTS: i32 = 5;

/// Random 6-digit code
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

pub fn hash_code(code: &str) -> String {
    let salt: [u8; 16] = rand::rng().random();
    let salt = hex::encode(salt);
    format!("{}${}", salt, digest(&salt, code))
}

/// Whether `code` matches a hash produced by [`hash_code`]
pub fn verify_code(code: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => {
            constant_time_eq(digest(salt, code).as_bytes(), expected.as_bytes())
        }
        None => false,
    }
}

/// Compares every byte so timing does not reveal the matching prefix
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn digest(salt: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}
