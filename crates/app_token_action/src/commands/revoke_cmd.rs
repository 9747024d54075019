//! The post step: revoke the token persisted by the main step.

use github_app_client::revoke_installation_token;
use secrecy::SecretString;
use tracing::{info, instrument};

use crate::config::Config;
use crate::errors::Error;
use crate::workflow;

/// Revokes the token the main step persisted, if any.
///
/// Missing state means revocation was not requested, or the main step
/// failed before a token was issued; either way there is nothing to do and
/// the step succeeds.
///
/// # Errors
///
/// Returns an error when the configuration cannot be read or GitHub
/// rejects the revocation request.
#[instrument]
pub async fn execute() -> Result<(), Error> {
    let Some(token) = workflow::read_state("token") else {
        info!("No token was persisted for revocation; nothing to do");
        return Ok(());
    };

    let config = Config::from_env()?;
    revoke_installation_token(&SecretString::from(token), &config.client_options())
        .await
        .map_err(app_token_core::Error::from)?;

    info!("Installation access token revoked");
    Ok(())
}
