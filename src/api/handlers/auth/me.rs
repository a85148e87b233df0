//! Current-user endpoint behind the bearer-token gate.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;

use super::principal::require_auth;
use super::state::AuthState;
use super::types::MeResponse;

/// Return the authenticated user's profile and permissions.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Authenticated user", body = MeResponse),
        (status = 401, description = "Unauthorized", body = String)
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    match require_auth(&headers, &pool, &auth_state).await {
        Ok(principal) => {
            (StatusCode::OK, Json(MeResponse::from_record(&principal.user))).into_response()
        }
        Err(status) if status == StatusCode::UNAUTHORIZED => {
            (status, "Unauthorized".to_string()).into_response()
        }
        Err(status) => (status, "Request failed".to_string()).into_response(),
    }
}
