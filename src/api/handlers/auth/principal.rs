//! Authenticated principal extraction for bearer-token requests.
//!
//! Flow Overview: read the `Authorization: Bearer` header, validate the
//! session token, and resolve its subject to a user row. Every failure mode
//! (missing header, bad token, unknown subject, deactivated account)
//! collapses into 401 so responses never reveal which check failed.

use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use sqlx::PgPool;
use tracing::error;

use super::state::AuthState;
use super::storage::{UserRecord, lookup_user_by_id};

/// Authenticated user context derived from a bearer token.
#[derive(Debug)]
pub(crate) struct Principal {
    pub(crate) user: UserRecord,
}

/// Resolve a bearer token into a principal, or return 401.
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    state: &AuthState,
) -> Result<Principal, StatusCode> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let Ok(user_id) = state.tokens().validate(&token) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    match lookup_user_by_id(pool, user_id).await {
        Ok(Some(user)) if user.is_active => Ok(Principal { user }),
        Ok(_) => Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            error!("Failed to resolve token subject: {err}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::extract_bearer_token;
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            extract_bearer_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn accepts_lowercase_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(extract_bearer_token(&headers), Some("abc".to_string()));
    }

    #[test]
    fn rejects_missing_or_empty_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
