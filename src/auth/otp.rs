//! One-time codes for email verification.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::{RngCore, rngs::OsRng};

/// Number of digits in a verification code.
pub const CODE_DIGITS: usize = 6;

const CODE_MODULUS: u32 = 1_000_000;

// Draws at or above this bound are re-drawn so the modulo stays uniform
// over [0, 999999].
const REJECTION_BOUND: u32 = u32::MAX - u32::MAX % CODE_MODULUS;

/// Generate a 6-digit verification code from OS entropy.
///
/// Codes gate account verification, so a general-purpose PRNG is not
/// acceptable here.
///
/// # Errors
///
/// Returns an error if the entropy source fails; never falls back to a
/// weaker source.
pub fn generate_code() -> Result<String> {
    loop {
        let mut bytes = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to generate verification code")?;
        let draw = u32::from_le_bytes(bytes);
        if draw < REJECTION_BOUND {
            return Ok(format!("{:06}", draw % CODE_MODULUS));
        }
    }
}

/// Whether a presented code matches the stored one and is still valid.
///
/// Exact string match plus expiry check. Clearing the stored code on success
/// is the caller's job and belongs in the same transaction as the lookup, so
/// a code can only ever be consumed once.
#[must_use]
pub fn code_matches(
    stored: &str,
    presented: &str,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    now < expires_at && stored == presented
}
