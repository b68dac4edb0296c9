//! Argon2id password hashing for stored user credentials.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// The stored value is not a PHC string.
    #[error("stored password is not a valid hash")]
    MalformedHash,

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password into a PHC string with a random salt.
///
/// ```
/// use brilink_core::auth::hash_password;
///
/// let stored = hash_password("rahasia123").unwrap();
/// assert!(stored.starts_with("$argon2id$"));
/// ```
///
/// # Errors
///
/// Returns `PasswordError::Hash` if hashing fails.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a plaintext password against a stored PHC string.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` if `stored` cannot be parsed.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
