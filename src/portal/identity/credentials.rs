//! Argon2 password handling. Only PHC hashes leave this module; the plain
//! credential is dropped as soon as it is hashed or checked.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::{OsRng, RngCore};

use crate::portal::error::PortalError;

/// Hash a plain password into a PHC string, e.g. `$argon2id$v=19$…`.
pub fn hash_password(plain: &str) -> Result<String, PortalError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PortalError::Validation(format!("unusable password: {err}")))
}

/// Check a plain password against a stored PHC string. An unparsable hash
/// counts as a mismatch.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Generate a credential for provisioned logins when the owner does not
/// supply one. Shape matches the onboarding sheet handed to new users.
pub fn generate_password() -> String {
    let digits = 10_000 + OsRng.next_u32() % 90_000;
    format!("Portal!{digits}")
}
