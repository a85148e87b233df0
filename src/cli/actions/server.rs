use crate::{
    api,
    api::handlers::auth::AuthConfig,
    auth::secret::TokenSecret,
    cli::actions::Action,
};
use anyhow::Result;

/// Handle the server action.
///
/// # Errors
///
/// Returns an error if the signing secret fails validation or the server
/// fails to start. The binary exits nonzero instead of serving with a
/// missing or weak secret.
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
        } => {
            let secret = TokenSecret::new(token_secret)?;

            api::new(port, dsn, &secret, AuthConfig::new()).await?;
        }
    }

    Ok(())
}
