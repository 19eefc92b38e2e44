//! Password hashing utilities using PBKDF2-HMAC-SHA256
//!
//! Credential records are serialized as
//! `base64(salt) + "$" + iterations + "$" + base64(derived_key)`.
//! Storing the iteration count inside the record lets the cost be raised
//! for new accounts without invalidating hashes written at the old cost:
//! verification always re-derives with whatever count the record carries.
//!
//! # Fast Mode
//!
//! When `fast: true` is passed to `hash_password`, the record is derived
//! with a much smaller iteration count. The format is identical and
//! `verify_password` handles both transparently; fast mode exists solely
//! to keep test suites quick. **Never use fast mode in production.**

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use pbkdf2::pbkdf2_hmac;
use rand_core::{OsRng, RngCore};
use scribe_common::validators::{self, PasswordError};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Salt length in bytes
const SALT_LEN: usize = 32;

/// Derived key length in bytes
const KEY_LEN: usize = 32;

/// Iteration count for production records
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Iteration count for fast (test-only) records
const FAST_ITERATIONS: u32 = 1_000;

/// Hash a password
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `fast` - If true, derive with the reduced test-only iteration count
///
/// # Returns
///
/// * `Ok(String)` - The serialized credential record
/// * `Err` - If the password fails validation
///
/// # Security
///
/// **Never use `fast: true` in production** - the reduced iteration count
/// defeats the point of a slow hash. Fast mode exists solely to speed up
/// test suites.
pub fn hash_password(password: &str, fast: bool) -> Result<String, PasswordError> {
    // Validate password format (failsafe - callers should also validate)
    validators::validate_password(password)?;

    let iterations = if fast { FAST_ITERATIONS } else { PBKDF2_ITERATIONS };
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut key);

    Ok(format!(
        "{}${}${}",
        BASE64.encode(salt),
        iterations,
        BASE64.encode(key)
    ))
}

/// Verify a password against a stored credential record
///
/// Re-derives the key with the salt and iteration count carried by the
/// record and compares digests in constant time.
///
/// Malformed records - wrong field count, undecodable base64, a zero or
/// non-numeric iteration count - verify as `false`. A stored record that
/// cannot be parsed must read as a failed login, never as a crash.
pub fn verify_password(password: &str, record: &str) -> bool {
    let mut parts = record.split('$');
    let (Some(salt_b64), Some(iterations_str), Some(key_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(salt) = BASE64.decode(salt_b64) else {
        return false;
    };
    let Ok(iterations) = iterations_str.parse::<u32>() else {
        return false;
    };
    let Ok(stored_key) = BASE64.decode(key_b64) else {
        return false;
    };
    if salt.is_empty() || iterations == 0 || stored_key.len() != KEY_LEN {
        return false;
    }

    let mut derived = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut derived);

    bool::from(derived.as_slice().ct_eq(&stored_key))
}
