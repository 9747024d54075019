//! Error classification for the token issuance flow.
//!
//! Every failure in the flow falls into one of five kinds, matching the
//! stages of the run: reading configuration, authenticating as the App,
//! resolving an installation, validating the requested permissions, and the
//! token exchange itself. The binary's top-level boundary renders these into
//! the run's failure report; nothing in the flow retries or recovers.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while issuing an installation access token.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input is missing or blank.
    ///
    /// The message names the missing input or environment source so the
    /// caller can fix the workflow definition.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The App credential material was rejected, or the authenticated
    /// client could not be built.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// No installation was found for the chosen organization or repository.
    ///
    /// The message states where the App was expected to be installed.
    #[error("{0}")]
    Resolution(String),

    /// The permission specification string is malformed.
    ///
    /// Rendered without a prefix: the parser's diagnostics already carry
    /// the offending entry and the expected format.
    #[error("{0}")]
    Validation(String),

    /// A GitHub API call failed: the token exchange itself, or a lookup
    /// that failed for a reason other than the installation not existing.
    #[error(transparent)]
    Issuance(#[from] github_app_client::Error),
}
