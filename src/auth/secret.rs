//! Signing-secret provisioning.

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

/// Minimum length of the signing secret in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Process-wide signing secret for session tokens.
///
/// Constructed once at startup from the environment and passed by reference
/// into the token service. There is intentionally no default value: a
/// hardcoded fallback would silently defeat the security model.
#[derive(Debug)]
pub struct TokenSecret(SecretString);

impl TokenSecret {
    /// Validate and wrap the signing secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or shorter than
    /// [`MIN_SECRET_BYTES`]. The caller decides whether to terminate; this
    /// constructor has no process-exit side effects.
    pub fn new(secret: SecretString) -> Result<Self> {
        let len = secret.expose_secret().len();
        if len == 0 {
            return Err(anyhow::anyhow!("signing secret is not set"));
        }
        if len < MIN_SECRET_BYTES {
            return Err(anyhow::anyhow!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes"
            ));
        }
        Ok(Self(secret))
    }

    /// Raw secret bytes for key derivation. Never log the return value.
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}
