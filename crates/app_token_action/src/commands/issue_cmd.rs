//! The main step: resolve the installation and issue a scoped token.

use app_token_core::{issue_token, Error as TokenError};
use chrono::SecondsFormat;
use github_app_client::{create_app_client, GitHubAppClient};
use secrecy::ExposeSecret;
use tracing::{info, instrument};

use crate::config::Config;
use crate::errors::Error;
use crate::workflow;

/// Runs the issuance flow end to end and publishes the results.
///
/// The issued token is registered with the log masker before anything else
/// is written. When the `revoke_token` input is set, the token is also
/// persisted as step state so the post step can revoke it after the job.
///
/// # Errors
///
/// Returns an error when configuration is invalid, the App credentials are
/// rejected, no installation is found, the permission specification is
/// malformed, the token exchange fails, or an output cannot be published.
#[instrument]
pub async fn execute() -> Result<(), Error> {
    let config = Config::from_env()?;

    let octocrab = create_app_client(
        config.app_id,
        config.private_key.expose_secret(),
        &config.client_options(),
    )
    .await
    .map_err(|e| {
        TokenError::Authentication(format!(
            "Could not authenticate as GitHub App {}: {}",
            config.app_id, e
        ))
    })?;
    let client = GitHubAppClient::new(octocrab);

    let issued = issue_token(
        &client,
        config.organization.as_deref(),
        &config.repository,
        &config.permissions,
    )
    .await?;

    let token_value = issued.token.token.expose_secret();
    workflow::mask_value(token_value);
    workflow::set_output("token", token_value)?;
    workflow::set_output("installation_id", &issued.installation_id.to_string())?;
    workflow::set_output(
        "expires_at",
        &issued.token.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    )?;

    if config.revoke_token {
        workflow::save_state("token", token_value)?;
    }

    info!(
        installation_id = issued.installation_id,
        expires_at = %issued.token.expires_at,
        revoke_after_run = config.revoke_token,
        "Issued installation access token"
    );

    Ok(())
}
