//! Authentication and credential-verification core.
//!
//! Everything security-sensitive lives here, behind four small surfaces:
//!
//! - [`secret`]: signing-secret provisioning. Loaded once at startup,
//!   at least 32 bytes, no default value. A missing or short secret is a
//!   startup error, never a silent fallback.
//! - [`password`]: Argon2id password hashing. Hashes are self-describing
//!   PHC strings, so stored credentials keep verifying when cost
//!   parameters change.
//! - [`token`]: HS256 session tokens with a fixed issuer and a 7-day
//!   expiry. Tokens are stateless bearer artifacts; there is no
//!   revocation list.
//! - [`otp`]: 6-digit one-time codes for email verification, drawn from
//!   OS entropy, single-use, valid for one hour.
//!
//! All operations are pure functions over their inputs plus the immutable
//! process secret, and are safe to call from any number of request tasks.

pub mod otp;
pub mod password;
pub mod secret;
pub mod token;
