//! # Platforma (Multi-tenant Administration Platform API)
//!
//! `platforma` is the administrative backend for multi-tenant deployments.
//! This crate carries the authentication and credential-verification core
//! plus the thin HTTP surface that exercises it.
//!
//! ## Authentication
//!
//! - **Passwords** are hashed with Argon2id (64 MiB, 3 passes, lanes of 4)
//!   into self-describing PHC strings; verification reads every parameter
//!   from the stored value, so cost bumps never invalidate old hashes.
//! - **Sessions** are stateless HS256 bearer tokens with a fixed issuer tag
//!   and a 7-day expiry. Validation pins the algorithm, so a token
//!   declaring anything but HS256 is rejected outright.
//! - **Email verification** uses single-use 6-digit codes from OS entropy,
//!   valid for one hour and consumed transactionally.
//!
//! ## Secrets
//!
//! The token signing secret comes from `PLATFORMA_TOKEN_SECRET`, must be at
//! least 32 characters, and has no default: the process refuses to start
//! without it.
//!
//! ## Error discipline
//!
//! Credential checks never explain themselves. A malformed stored hash, a
//! wrong password, an unknown address, and an expired code all surface as
//! the same uniform rejection, which keeps the API from acting as an oracle
//! for account state.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
