//! # App Token Core
//!
//! This crate provides the core logic for minting short-lived, scope-limited
//! GitHub App installation access tokens inside automated workflows.
//!
//! ## Overview
//!
//! A run walks a strictly sequential flow:
//! 1. Select the installation resolution strategy from the inputs
//! 2. Resolve the installation (by organization or by repository)
//! 3. Validate and parse the requested permission subset
//! 4. Exchange the App credentials for an installation access token
//!
//! Every step's failure is classified into one of the [`Error`] kinds and
//! aborts the run; there are no retries and no partial success.
//!
//! ## Main entry points
//!
//! - [`issue_token`] - drive the flow against an [`AppInstallationClient`]
//! - [`parse_permissions`] - validate a raw permission specification
//! - [`ResolutionStrategy`] - how the installation will be looked up

use github_app_client::models::AccessToken;
use github_app_client::AppInstallationClient;
use tracing::{debug, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod permissions;
pub use permissions::{parse_permissions, PermissionMap};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// How the App installation should be resolved.
///
/// The strategy is chosen exactly once, from input presence: a non-empty
/// organization input selects the organization lookup, otherwise the
/// repository the workflow runs in is used. The two strategies are mutually
/// exclusive; there is no fallback from one to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Look the installation up on an organization.
    ByOrganization(String),
    /// Look the installation up on a repository.
    ByRepository { owner: String, repo: String },
}

impl ResolutionStrategy {
    /// Selects the resolution strategy from the provided inputs.
    ///
    /// The repository identifier is the ambient scope the workflow runs in
    /// and must be present even when an organization is given; its
    /// `"owner/repo"` shape is only enforced when it is actually used for
    /// the lookup.
    ///
    /// # Errors
    ///
    /// Returns an `Error::Configuration` when the repository identifier is
    /// missing or blank, or when the repository lookup is selected and the
    /// identifier is not in `"owner/repo"` form.
    pub fn select(organization: Option<&str>, repository: &str) -> Result<Self, Error> {
        let repository = repository.trim();
        if repository.is_empty() {
            return Err(Error::Configuration(
                "GITHUB_REPOSITORY is missing; it must be set to \"<owner>/<repo>\"".to_string(),
            ));
        }

        if let Some(org) = organization.map(str::trim).filter(|org| !org.is_empty()) {
            return Ok(ResolutionStrategy::ByOrganization(org.to_string()));
        }

        match repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok(ResolutionStrategy::ByRepository {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(Error::Configuration(format!(
                "GITHUB_REPOSITORY \"{repository}\" is not in \"<owner>/<repo>\" form"
            ))),
        }
    }
}

/// The outcome of a successful issuance run.
#[derive(Debug)]
pub struct IssuedToken {
    /// The installation the token was issued for.
    pub installation_id: u64,
    /// The token value and its expiry metadata.
    pub token: AccessToken,
}

/// Issues an installation access token.
///
/// Resolves the installation according to [`ResolutionStrategy::select`],
/// parses the raw permission specification, and performs the token
/// exchange. Resolution runs before permission validation; a run that
/// cannot find an installation never attempts the token exchange.
///
/// # Arguments
///
/// * `client` - The authenticated GitHub App capability.
/// * `organization` - Optional organization name; selects the organization
///   lookup when non-empty.
/// * `repository` - The ambient `"owner/repo"` identifier of the workflow.
/// * `raw_permissions` - Comma-separated `name:level` pairs. An empty
///   string requests the installation's full configured grant.
///
/// # Errors
///
/// * `Error::Configuration` - repository identifier missing or malformed.
/// * `Error::Resolution` - the App is not installed on the chosen target.
/// * `Error::Validation` - the permission specification is malformed.
/// * `Error::Issuance` - a GitHub API call failed.
#[instrument(skip(client, raw_permissions))]
pub async fn issue_token(
    client: &dyn AppInstallationClient,
    organization: Option<&str>,
    repository: &str,
    raw_permissions: &str,
) -> Result<IssuedToken, Error> {
    let strategy = ResolutionStrategy::select(organization, repository)?;

    let installation = match &strategy {
        ResolutionStrategy::ByOrganization(org) => {
            info!(org = %org, "Resolving installation by organization");
            client.get_org_installation(org).await?.ok_or_else(|| {
                Error::Resolution(format!(
                    "The GitHub App is not installed on organization \"{org}\"."
                ))
            })?
        }
        ResolutionStrategy::ByRepository { owner, repo } => {
            info!(owner = %owner, repo = %repo, "Resolving installation by repository");
            client.get_repo_installation(owner, repo).await?.ok_or_else(|| {
                Error::Resolution(format!(
                    "The GitHub App is not installed on repository \"{owner}/{repo}\"."
                ))
            })?
        }
    };

    let permissions = parse_permissions(raw_permissions)?;
    debug!(
        installation_id = installation.id,
        permission_count = permissions.len(),
        "Requesting installation access token"
    );

    let token = client
        .create_installation_token(installation.id, &permissions)
        .await?;

    info!(
        installation_id = installation.id,
        expires_at = %token.expires_at,
        "Issued installation access token"
    );

    Ok(IssuedToken {
        installation_id: installation.id,
        token,
    })
}
