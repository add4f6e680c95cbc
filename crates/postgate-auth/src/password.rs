//! Password hashing
//!
//! Argon2id with a fixed work factor and a fresh random salt per hash.
//! Hashes are stored as PHC strings, which embed the salt and parameters.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::debug;

use crate::error::AuthError;

/// Memory cost in KiB
const MEMORY_COST_KIB: u32 = 19_456;
/// Number of passes
const TIME_COST: u32 = 2;
/// Degree of parallelism
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a plaintext password against a stored hash
///
/// A hash that cannot be parsed never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash on the blocking pool so request tasks keep making progress
pub async fn hash_password_async(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))?
}

/// Verify on the blocking pool
pub async fn verify_password_async(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))
}
