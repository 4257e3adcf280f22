use crate::error::{AuthError, Result};

/// Fixed bcrypt work factor. Hashes are salted, so identical passwords
/// produce distinct hashes across calls.
pub const BCRYPT_COST: u32 = 10;

/// Hash a password for storage. Fails only on underlying hasher failure,
/// which is fatal to the registration in flight.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored hash. A malformed hash is treated as
/// a non-match, never surfaced as an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
