//! Authentication endpoints and their shared state.
//!
//! Handlers stay thin: request validation and response shaping here, all
//! credential work in [`crate::auth`], all persistence in [`storage`].

pub mod login;
pub mod me;
pub mod register;
pub mod verification;

pub(crate) mod principal;
pub(crate) mod roles;
pub(crate) mod storage;
pub(crate) mod types;

mod state;
mod utils;

pub use state::{AuthConfig, AuthState};
