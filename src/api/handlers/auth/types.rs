//! Request/response types for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::permissions_for;
use super::storage::UserRecord;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub email: String,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendCodeRequest {
    pub email: String,
}

/// User payload attached to login/verify responses.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub tenant_id: Option<i64>,
    pub permissions: Vec<String>,
}

impl UserResponse {
    pub(super) fn from_record(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
            tenant_id: user.tenant_id,
            permissions: permissions_for(&user.role)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

impl TokenResponse {
    pub(super) fn bearer(access_token: String, user: &UserRecord) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user: UserResponse::from_record(user),
        }
    }
}

/// Payload for `GET /v1/auth/me`; includes account state flags.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub tenant_id: Option<i64>,
    pub is_active: bool,
    pub email_verified: bool,
    pub permissions: Vec<String>,
}

impl MeResponse {
    pub(super) fn from_record(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
            tenant_id: user.tenant_id,
            is_active: user.is_active,
            email_verified: user.email_verified,
            permissions: permissions_for(&user.role)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}
