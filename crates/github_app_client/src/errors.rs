//! Error types for GitHub App client operations.
//!
//! This module defines the error types that can occur when talking to the
//! GitHub API as a GitHub App: authentication failures, installation lookup
//! failures, and token exchange failures.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub App client operations.
///
/// Each variant provides specific context about what went wrong so that the
/// caller can decide how to report the failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    ///
    /// This error occurs when a GitHub API request fails for unspecified
    /// reasons. Check the GitHub API status and ensure your request
    /// parameters are correct.
    #[error("API request failed")]
    ApiError(),

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - The App's private key cannot be parsed
    /// - The client cannot be built with the App credentials
    ///
    /// The contained string provides specific details about the failure.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Failed to create an installation access token.
    ///
    /// This error occurs when the token exchange request for the given
    /// installation fails. Common causes include:
    /// - The App lacks the requested permissions
    /// - The installation was removed or suspended
    ///
    /// Parameter: installation id.
    #[error("Failed to create an installation access token for installation {0}")]
    FailedToCreateAccessToken(u64),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// GitHub rejected the token revocation request.
    ///
    /// The token is invalid or was already revoked. A token that GitHub no
    /// longer recognizes cannot be revoked again, so callers may choose to
    /// treat this as a soft failure.
    #[error("Token revocation was rejected; the token is invalid or already revoked")]
    RevocationRejected,
}
