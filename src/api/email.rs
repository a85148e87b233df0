//! Verification-code delivery abstraction.
//!
//! The auth handlers hand freshly generated codes to an [`EmailSender`];
//! production deployments plug in a real mailer behind the trait, local dev
//! uses [`LogEmailSender`]. Codes are only ever passed to the sender and
//! never appear in the regular request logs.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

/// A verification email about to be delivered.
#[derive(Clone, Debug)]
pub struct VerificationEmail<'a> {
    pub to_email: &'a str,
    pub code: &'a str,
    pub expires_at: DateTime<Utc>,
}

/// Email delivery abstraction for verification codes.
pub trait EmailSender: Send + Sync {
    /// Deliver the message or return an error; the account stays pending
    /// either way, and the code can be resent.
    fn send_verification(&self, message: &VerificationEmail<'_>) -> Result<()>;
}

/// Local dev sender that logs the message instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send_verification(&self, message: &VerificationEmail<'_>) -> Result<()> {
        info!(
            to_email = %message.to_email,
            code = %message.code,
            expires_at = %message.expires_at,
            "verification email send stub"
        );
        Ok(())
    }
}
