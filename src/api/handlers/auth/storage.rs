//! Database helpers for users and email-verification state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;

use crate::auth::otp;

use super::utils::is_unique_violation;

/// Row data the auth handlers need.
#[derive(Debug)]
pub(crate) struct UserRecord {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) password_hash: String,
    pub(crate) role: String,
    pub(crate) tenant_id: Option<i64>,
    pub(crate) is_active: bool,
    pub(crate) email_verified: bool,
}

/// Outcome when attempting to create a new pending user.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(i64),
    Conflict,
}

const USER_COLUMNS: &str = "id, email, full_name, password_hash, role, tenant_id, \
     is_active, email_verified, email_verification_code, email_verification_expires";

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        tenant_id: row.get("tenant_id"),
        is_active: row.get("is_active"),
        email_verified: row.get("email_verified"),
    }
}

pub(crate) async fn lookup_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;

    Ok(row.as_ref().map(user_from_row))
}

pub(crate) async fn lookup_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<UserRecord>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by id")?;

    Ok(row.as_ref().map(user_from_row))
}

/// Insert a new, unverified user with a pending verification code.
pub(super) async fn insert_pending_user(
    pool: &PgPool,
    email: &str,
    full_name: &str,
    password_hash: &str,
    code: &str,
    expires_at: DateTime<Utc>,
) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users
            (email, full_name, password_hash, role, is_active, email_verified,
             email_verification_code, email_verification_expires)
        VALUES ($1, $2, $3, 'USER', TRUE, FALSE, $4, $5)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(code)
        .bind(expires_at)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(row.get("id"))),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Atomically consume a verification code and activate the account.
///
/// The row is locked for the duration of the check so a code can only be
/// consumed once: on success the code and expiry are cleared and
/// `email_verified` is set in the same transaction. Any failed check
/// (unknown email, already verified, no pending code, expired, mismatch)
/// returns `Ok(None)` without distinguishing which one failed.
pub(super) async fn consume_verification_code(
    pool: &PgPool,
    email: &str,
    presented: &str,
    now: DateTime<Utc>,
) -> Result<Option<UserRecord>> {
    let mut tx = pool.begin().await.context("begin verification transaction")?;

    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 FOR UPDATE");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = %query
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(&mut *tx)
        .instrument(span)
        .await
        .context("failed to lookup pending verification")?;

    let Some(row) = row else {
        let _ = tx.rollback().await;
        return Ok(None);
    };

    let mut user = user_from_row(&row);
    let stored: Option<String> = row.get("email_verification_code");
    let expires_at: Option<DateTime<Utc>> = row.get("email_verification_expires");

    let accepted = match (user.email_verified, stored, expires_at) {
        (false, Some(stored), Some(expires_at)) => {
            otp::code_matches(&stored, presented, expires_at, now)
        }
        _ => false,
    };

    if !accepted {
        let _ = tx.rollback().await;
        return Ok(None);
    }

    let update = r"
        UPDATE users
        SET email_verified = TRUE,
            email_verification_code = NULL,
            email_verification_expires = NULL
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = update
    );
    sqlx::query(update)
        .bind(user.id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to consume verification code")?;

    tx.commit().await.context("commit verification transaction")?;

    user.email_verified = true;
    Ok(Some(user))
}

/// Supersede the pending verification code for an unverified account.
///
/// Returns `false` when the email is unknown or already verified; callers
/// keep their response identical either way.
pub(super) async fn refresh_verification_code(
    pool: &PgPool,
    email: &str,
    code: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool> {
    let query = r"
        UPDATE users
        SET email_verification_code = $2,
            email_verification_expires = $3
        WHERE email = $1 AND email_verified = FALSE
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to refresh verification code")?;

    Ok(row.is_some())
}
