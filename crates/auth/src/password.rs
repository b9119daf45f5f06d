//! Password hashing and verification (bcrypt).

use thiserror::Error;

/// Fixed bcrypt cost factor for stored password hashes.
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("password verification failed: {0}")]
    Verify(String),
}

/// Hash a plaintext password with the fixed cost factor.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on a well-formed hash that does not match; `Err` only
/// when the stored hash itself is malformed.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, hash).map_err(|e| PasswordError::Verify(e.to_string()))
}
