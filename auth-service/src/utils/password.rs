//! Password hashing - PBKDF2-HMAC-SHA256 with an explicit salt.
//!
//! Salt and hash travel as base64 strings. The salt is stored next to
//! the hash; iteration count and output length are fixed constants, not
//! caller input.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::services::ServiceError;

/// Iteration count for the key derivation. Raising it invalidates no
/// stored hashes but changes what new ones verify against, so treat it
/// as versioned.
const PBKDF2_ITERATIONS: u32 = 310_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// Generate a fresh random salt, base64-encoded for storage.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    BASE64.encode(salt)
}

/// Derive the storable hash for a password and an encoded salt.
///
/// An undecodable salt is a caller error, rejected before any
/// derivation work.
pub fn hash_password(password: &str, salt: &str) -> Result<String, ServiceError> {
    let salt_bytes = BASE64
        .decode(salt)
        .map_err(|e| ServiceError::Validation(format!("Malformed password salt: {}", e)))?;

    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &salt_bytes,
        PBKDF2_ITERATIONS,
        &mut derived,
    );

    Ok(BASE64.encode(derived))
}

/// Verify a password against a stored hash and salt.
///
/// Malformed stored material fails fast as a mismatch with no partial
/// comparison; a well-formed comparison is constant-time.
pub fn verify_password(hash: &str, password: &str, salt: &str) -> bool {
    let Ok(expected) = BASE64.decode(hash) else {
        return false;
    };
    let Ok(salt_bytes) = BASE64.decode(salt) else {
        return false;
    };
    if expected.len() != HASH_LENGTH {
        return false;
    }

    let mut derived = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &salt_bytes,
        PBKDF2_ITERATIONS,
        &mut derived,
    );

    derived.ct_eq(expected.as_slice()).into()
}
