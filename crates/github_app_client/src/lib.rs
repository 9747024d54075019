//! Crate for interacting with the GitHub REST API as a GitHub App.
//!
//! This crate provides a client that authenticates as a GitHub App using its
//! ID and private key, resolves where the App is installed (by organization
//! or by repository), and exchanges the App credentials for short-lived
//! installation access tokens. It also supports revoking a token once the
//! caller is done with it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use http::StatusCode;
use jsonwebtoken::EncodingKey;
use octocrab::{Octocrab, Result as OctocrabResult};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, error, info, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod models;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Connection options for talking to GitHub.
///
/// `base_url` overrides the API endpoint for GitHub Enterprise Server
/// deployments. `proxy` is the outbound proxy the caller resolved from its
/// configuration; the transport connects through it when one is set.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Overrides the API endpoint (GitHub Enterprise Server support).
    pub base_url: Option<Url>,
    /// Outbound proxy for API calls, already resolved against the ambient
    /// environment by the caller.
    pub proxy: Option<Url>,
}

/// Operations the token issuance flow needs from GitHub.
///
/// The flow depends on this trait rather than on [`GitHubAppClient`] so that
/// installation resolution and token issuance can be tested without network
/// calls.
#[async_trait]
pub trait AppInstallationClient: Send + Sync {
    /// Looks up the App installation for an organization.
    ///
    /// Returns `Ok(None)` when the App is not installed on the organization.
    ///
    /// # Errors
    /// Returns an `Error::InvalidResponse` if the API call fails for any
    /// reason other than the installation not existing.
    async fn get_org_installation(&self, org: &str)
        -> Result<Option<models::Installation>, Error>;

    /// Looks up the App installation for a repository.
    ///
    /// Returns `Ok(None)` when the App is not installed on the repository.
    ///
    /// # Errors
    /// Returns an `Error::InvalidResponse` if the API call fails for any
    /// reason other than the installation not existing.
    async fn get_repo_installation(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<models::Installation>, Error>;

    /// Creates an installation access token for the given installation,
    /// scoped to the given permissions.
    ///
    /// An empty permission map requests the installation's full configured
    /// permission set; the `permissions` field is omitted from the request
    /// body entirely in that case.
    ///
    /// # Errors
    /// Returns an `Error::FailedToCreateAccessToken` if the token exchange
    /// request fails.
    async fn create_installation_token(
        &self,
        installation_id: u64,
        permissions: &BTreeMap<String, String>,
    ) -> Result<models::AccessToken, Error>;
}

/// A client for the GitHub API, authenticated as a GitHub App.
#[derive(Debug)]
pub struct GitHubAppClient {
    client: Octocrab,
}

impl GitHubAppClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

/// Request body for the installation access token endpoint.
///
/// An empty permission map must not be serialized at all: sending
/// `"permissions": {}` would request a token with no permissions, while
/// omitting the field requests the installation's full grant.
#[derive(Serialize, Debug, Clone)]
struct InstallationTokenPayload {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    permissions: BTreeMap<String, String>,
}

#[async_trait]
impl AppInstallationClient for GitHubAppClient {
    #[instrument(skip(self), fields(org = %org))]
    async fn get_org_installation(
        &self,
        org: &str,
    ) -> Result<Option<models::Installation>, Error> {
        info!(org = org, "Looking up App installation for organization");

        let path = format!("/orgs/{}/installation", org);
        let result: OctocrabResult<models::Installation> =
            self.client.get(path, None::<&()>).await;

        match result {
            Ok(installation) => {
                info!(
                    org = org,
                    installation_id = installation.id,
                    account_login = installation.account.login,
                    "Found installation for organization"
                );
                Ok(Some(installation))
            }
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                debug!(org = org, "No installation found for organization");
                Ok(None)
            }
            Err(e) => {
                log_octocrab_error("Failed to look up organization installation", e);
                Err(Error::InvalidResponse)
            }
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repo_installation(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<models::Installation>, Error> {
        info!(
            owner = owner,
            repo = repo,
            "Looking up App installation for repository"
        );

        let path = format!("/repos/{}/{}/installation", owner, repo);
        let result: OctocrabResult<models::Installation> =
            self.client.get(path, None::<&()>).await;

        match result {
            Ok(installation) => {
                info!(
                    owner = owner,
                    repo = repo,
                    installation_id = installation.id,
                    "Found installation for repository"
                );
                Ok(Some(installation))
            }
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code == StatusCode::NOT_FOUND =>
            {
                debug!(owner = owner, repo = repo, "No installation found for repository");
                Ok(None)
            }
            Err(e) => {
                log_octocrab_error("Failed to look up repository installation", e);
                Err(Error::InvalidResponse)
            }
        }
    }

    /// Exchanges the App credentials for an installation access token.
    ///
    /// # Arguments
    ///
    /// * `installation_id` - The ID of the installation to issue a token for.
    /// * `permissions` - The permission subset to scope the token to. An
    ///   empty map requests the installation's full configured grant.
    ///
    /// # Errors
    ///
    /// Returns an `Error::FailedToCreateAccessToken` if:
    /// - The App lacks one of the requested permissions
    /// - The installation no longer exists
    /// - The API call fails
    #[instrument(skip(self, permissions), fields(installation_id = %installation_id))]
    async fn create_installation_token(
        &self,
        installation_id: u64,
        permissions: &BTreeMap<String, String>,
    ) -> Result<models::AccessToken, Error> {
        info!(
            installation_id = installation_id,
            permission_count = permissions.len(),
            "Requesting installation access token from GitHub API"
        );

        let path = format!("/app/installations/{}/access_tokens", installation_id);
        let payload = InstallationTokenPayload {
            permissions: permissions.clone(),
        };
        let result: OctocrabResult<models::AccessToken> =
            self.client.post(path, Some(&payload)).await;

        match result {
            Ok(token) => {
                info!(
                    installation_id = installation_id,
                    expires_at = %token.expires_at,
                    "Successfully created installation access token"
                );
                Ok(token)
            }
            Err(e) => {
                log_octocrab_error("Failed to create installation access token", e);
                Err(Error::FailedToCreateAccessToken(installation_id))
            }
        }
    }
}

/// Creates an `Octocrab` client authenticated as a GitHub App using a JWT token.
///
/// This function parses the App's RSA private key, and uses it to create an
/// authenticated `Octocrab` client. The client can then be used to perform
/// API operations on behalf of the GitHub App.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App.
/// * `private_key` - The private key associated with the GitHub App, in PEM format.
/// * `options` - Endpoint and proxy overrides.
///
/// # Errors
///
/// This function returns an `Error::AuthError` in the following cases:
/// - If the private key cannot be parsed.
/// - If the base URL cannot be used as an API endpoint.
/// - If the `Octocrab` client cannot be built.
#[instrument(skip(private_key))]
pub async fn create_app_client(
    app_id: u64,
    private_key: &str,
    options: &ClientOptions,
) -> Result<Octocrab, Error> {
    info!(
        app_id = app_id,
        key_length = private_key.len(),
        "Creating GitHub App client with provided credentials"
    );

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let builder = Octocrab::builder();
    let builder = match &options.base_url {
        Some(url) => builder.base_uri(url.as_str()).map_err(|e| {
            error!(app_id = app_id, base_url = %url, "Invalid GitHub API base URL");
            Error::AuthError(format!("Invalid GitHub API base URL \"{}\": {}", url, e))
        })?,
        None => builder,
    };

    if let Some(proxy) = &options.proxy {
        debug!(app_id = app_id, proxy = %proxy, "Outbound proxy configured for GitHub API calls");
    }

    let octocrab = builder.app(app_id.into(), key).build().map_err(|e| {
        error!(
            app_id = app_id,
            error = ?e,
            "Failed to build Octocrab client with GitHub App credentials"
        );
        Error::AuthError("Failed to build the GitHub client for the App.".to_string())
    })?;

    info!(app_id = app_id, "Successfully created GitHub App client");

    Ok(octocrab)
}

/// Revokes an installation access token.
///
/// The revocation endpoint is authenticated with the token itself, so this
/// builds a fresh token-authenticated client rather than reusing the
/// JWT-authenticated App client.
///
/// # Errors
///
/// Returns `Error::RevocationRejected` when GitHub no longer recognizes the
/// token (it is invalid or was already revoked), and `Error::ApiError` or
/// `Error::InvalidResponse` for transport-level failures.
#[instrument(skip(token))]
pub async fn revoke_installation_token(
    token: &SecretString,
    options: &ClientOptions,
) -> Result<(), Error> {
    let builder = Octocrab::builder();
    let builder = match &options.base_url {
        Some(url) => builder.base_uri(url.as_str()).map_err(|e| {
            error!(base_url = %url, "Invalid GitHub API base URL");
            Error::AuthError(format!("Invalid GitHub API base URL \"{}\": {}", url, e))
        })?,
        None => builder,
    };
    let client = builder
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| {
            error!(error = ?e, "Failed to build token-authenticated client for revocation");
            Error::ApiError()
        })?;

    // The endpoint returns 204 with no body, so the low-level request
    // method is used and the status is inspected directly.
    let response = client
        ._delete("/installation/token", None::<&()>)
        .await
        .map_err(|e| {
            log_octocrab_error("Failed to call the token revocation endpoint", e);
            Error::ApiError()
        })?;

    match response.status() {
        StatusCode::NO_CONTENT => {
            info!("Installation access token revoked");
            Ok(())
        }
        StatusCode::UNAUTHORIZED => {
            error!("Token revocation rejected; the token is invalid or already revoked");
            Err(Error::RevocationRejected)
        }
        status => {
            error!(status = %status, "Unexpected status from the token revocation endpoint");
            Err(Error::InvalidResponse)
        }
    }
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                status_code = %err.status_code,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
