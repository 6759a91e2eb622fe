/// Password Hashing and Verification
///
/// bcrypt with a fresh salt per call; the salt and cost are embedded in the
/// resulting hash so verification needs nothing else.

use bcrypt::{hash, verify};

use crate::error::AppError;

/// Lowest cost bcrypt accepts
pub const MIN_HASH_COST: u32 = 4;
/// Highest cost bcrypt accepts
pub const MAX_HASH_COST: u32 = 31;

/// Hash a password using bcrypt
///
/// # Arguments
/// * `password` - Plain text password to hash
/// * `cost` - bcrypt cost factor
///
/// # Errors
/// Returns an internal error if bcrypt fails (bad cost, no entropy)
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
///
/// A mismatch is `false`. A hash bcrypt cannot parse is also `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be checked");
            false
        }
    }
}
