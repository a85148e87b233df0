//! Auth state and configuration shared by the handlers.

use crate::auth::{secret::TokenSecret, token::TokenService};

const DEFAULT_CODE_TTL_SECONDS: i64 = 60 * 60;

/// Tunables for the auth endpoints.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    code_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_code_ttl_seconds(mut self, seconds: i64) -> Self {
        self.code_ttl_seconds = seconds;
        self
    }

    pub(crate) fn code_ttl_seconds(&self) -> i64 {
        self.code_ttl_seconds
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable per-process auth state: configuration plus the token service.
///
/// Built once at startup and shared across request tasks via an extension;
/// nothing in here is mutated after construction.
pub struct AuthState {
    config: AuthConfig,
    tokens: TokenService,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, secret: &TokenSecret) -> Self {
        Self {
            config,
            tokens: TokenService::new(secret),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, AuthState};
    use crate::auth::secret::TokenSecret;
    use anyhow::Result;
    use secrecy::SecretString;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new();
        assert_eq!(config.code_ttl_seconds(), super::DEFAULT_CODE_TTL_SECONDS);

        let config = config.with_code_ttl_seconds(120);
        assert_eq!(config.code_ttl_seconds(), 120);
    }

    #[test]
    fn auth_state_issues_validatable_tokens() -> Result<()> {
        let secret = TokenSecret::new(SecretString::from(
            "0123456789abcdef0123456789abcdef".to_string(),
        ))?;
        let state = AuthState::new(AuthConfig::new(), &secret);
        let token = state.tokens().issue(7)?;
        assert_eq!(state.tokens().validate(&token)?, 7);
        Ok(())
    }
}
