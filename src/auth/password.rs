//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored as PHC strings
//! (`$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`), so every parameter
//! needed for verification travels inside the stored value. Cost settings
//! can be raised for new hashes without invalidating old ones.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;

/// Memory cost in KiB (64 MiB).
const MEMORY_COST_KIB: u32 = 64 * 1024;
/// Number of passes over memory.
const TIME_COST: u32 = 3;
/// Degree of parallelism.
const PARALLELISM: u32 = 4;
/// Derived key length in bytes.
const OUTPUT_LEN: usize = 32;

fn hasher() -> Result<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|_| anyhow::anyhow!("invalid Argon2id parameters"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password with a fresh random salt.
///
/// Derivation is memory-hard and takes tens of milliseconds; async callers
/// should run it on a blocking thread.
///
/// # Errors
///
/// Returns an error only if the entropy source or the key derivation itself
/// fails; both are treated as fatal local errors, never as a soft failure.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| anyhow::anyhow!("failed to hash password"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored PHC hash.
///
/// Parameters, salt, and algorithm are read from the stored value itself.
/// A malformed blob or an unrecognized algorithm tag counts as a mismatch,
/// indistinguishable from a wrong password from the caller's point of view.
/// The comparison of derived keys is constant-time.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{hash_password, verify_password};
    use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version, password_hash::SaltString};
    use rand::rngs::OsRng;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("Secret123!").unwrap();
        assert!(verify_password("Secret123!", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("Secret123!").unwrap();
        assert!(!verify_password("Secret123?", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn stored_blob_is_argon2id_with_expected_parameters() {
        let hash = hash_password("Secret123!").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=65536,t=3,p=4$"));
    }

    #[test]
    fn salts_differ_between_calls_but_both_verify() {
        let first = hash_password("Secret123!").unwrap();
        let second = hash_password("Secret123!").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("Secret123!", &first));
        assert!(verify_password("Secret123!", &second));
    }

    #[test]
    fn malformed_blob_is_a_mismatch_not_an_error() {
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "not-a-phc-string"));
        assert!(!verify_password("password", "$argon2id$v=19$m=65536,t=3"));
        // Unknown algorithm tag in an otherwise well-formed PHC string.
        assert!(!verify_password(
            "password",
            "$scrypt$ln=16,r=8,p=1$aM15713r3Xsvxbi31lqr1Q$nFNh2CVHVjNldFVKDHDlm4CmdRSCdEBsjjJxD+iCs5E"
        ));
    }

    #[test]
    fn hashes_with_older_cost_parameters_still_verify() {
        // Lighter parameters stand in for hashes created before a cost bump.
        let params = Params::new(19456, 2, 1, Some(32)).unwrap();
        let legacy = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = legacy
            .hash_password("Secret123!".as_bytes(), &salt)
            .unwrap()
            .to_string();
        assert!(hash.contains("m=19456,t=2,p=1"));
        assert!(verify_password("Secret123!", &hash));
        assert!(!verify_password("Secret123?", &hash));
    }
}
