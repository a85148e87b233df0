//! API handlers for Platforma.
//!
//! Routes are grouped by concern: `auth` owns registration, login, email
//! verification, and the bearer-token gate; `health` and `root` are
//! operational endpoints.

pub mod auth;
pub mod health;
pub mod root;
