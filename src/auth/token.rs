//! Session token issuance and validation.
//!
//! Tokens are HS256 `JWT`s carrying a typed claim set: subject (user id),
//! issued-at, expiry, and a fixed issuer tag. Validation accepts exactly one
//! algorithm; a token declaring anything else is rejected before signature
//! checks, which closes off algorithm-confusion attacks.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::secret::TokenSecret;

/// Issuer tag embedded in every token and required on validation.
pub const ISSUER: &str = "platform-v2";

/// Tokens expire 7 days after issuance.
const TOKEN_TTL_DAYS: i64 = 7;

/// The only algorithm this service signs with or accepts.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by a session token.
///
/// Deserialized field-by-field: a token with a missing claim or a
/// non-integer subject fails to parse and is rejected.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issuer tag, always [`ISSUER`].
    pub iss: String,
}

/// Issues and validates session tokens.
///
/// Holds the keys derived from the process [`TokenSecret`]; construct once
/// at startup and share by reference. Both operations are pure and safe to
/// call concurrently.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &TokenSecret) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is a hard boundary; the default leeway would accept tokens
        // for another minute past their expiry claim.
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        Self {
            encoding: EncodingKey::from_secret(secret.expose().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose().as_bytes()),
            validation,
        }
    }

    /// Issue a token for the given user id.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails, which is unreachable once the
    /// secret has passed startup validation.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
            iss: ISSUER.to_string(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)
            .context("failed to sign session token")
    }

    /// Validate a token and return its subject (user id).
    ///
    /// Rejects on a header algorithm other than HS256, a bad signature, a
    /// wrong or missing issuer, an expired `exp`, or a missing or
    /// non-integer subject.
    ///
    /// # Errors
    ///
    /// Every rejection reason collapses into the same error; callers cannot
    /// (and must not) distinguish why a token was refused.
    pub fn validate(&self, token: &str) -> Result<i64> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| anyhow::anyhow!("invalid session token"))?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Claims, ISSUER, TokenService};
    use crate::auth::secret::TokenSecret;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use secrecy::SecretString;
    use serde_json::json;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> TokenService {
        let secret = TokenSecret::new(SecretString::from(TEST_SECRET)).unwrap();
        TokenService::new(&secret)
    }

    fn encoding_key() -> EncodingKey {
        EncodingKey::from_secret(TEST_SECRET.as_bytes())
    }

    #[test]
    fn issue_then_validate_returns_subject() {
        let service = service();
        let token = service.issue(42).unwrap();
        assert_eq!(service.validate(&token).unwrap(), 42);
    }

    #[test]
    fn token_shape_is_three_dot_separated_parts() {
        let token = service().issue(7).unwrap();
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: 42,
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
            iss: ISSUER.to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key()).unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let other = TokenSecret::new(SecretString::from(
            "ffffffffffffffffffffffffffffffff".to_string(),
        ))
        .unwrap();
        let token = TokenService::new(&other).issue(42).unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn token_with_a_different_algorithm_is_rejected() {
        // Same secret, same claims, but the header declares HS384.
        let now = Utc::now();
        let claims = Claims {
            sub: 42,
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
            iss: ISSUER.to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS384), &claims, &encoding_key()).unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn token_with_a_wrong_issuer_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: 42,
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
            iss: "someone-else".to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key()).unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn token_with_a_non_integer_subject_is_rejected() {
        let now = Utc::now();
        let claims = json!({
            "sub": "not-a-number",
            "iat": now.timestamp(),
            "exp": (now + Duration::days(1)).timestamp(),
            "iss": ISSUER,
        });
        let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key()).unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service();
        let token = service.issue(42).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = parts[1].chars().rev().collect();
        assert!(service.validate(&parts.join(".")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service().validate("").is_err());
        assert!(service().validate("not.a.token").is_err());
    }
}
