//! Domain types for GitHub App installations and installation access tokens.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub account (user or organization).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    /// The unique ID of the account
    pub id: u64,
    /// The login name of the account
    pub login: String,
    /// The type of account (User or Organization)
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Represents a GitHub App installation.
///
/// An installation binds the App to a specific organization or repository
/// and is the scope against which access tokens are issued.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Installation {
    /// The unique ID of the installation
    pub id: u64,
    /// The account (user or organization) where the app is installed
    pub account: Account,
    /// Optional repository selection details ("all" or "selected")
    pub repository_selection: Option<String>,
}

/// A short-lived installation access token as returned by the token
/// exchange endpoint.
///
/// The token value is wrapped in [`SecretString`] from the moment it is
/// deserialized so it never shows up in `Debug` output.
#[derive(Debug, Deserialize)]
pub struct AccessToken {
    /// The token value. Expose only at the single point of output.
    pub token: SecretString,
    /// When the token stops being accepted by GitHub (roughly one hour
    /// after issuance).
    pub expires_at: DateTime<Utc>,
    /// The permissions GitHub actually granted to the token.
    #[serde(default)]
    pub permissions: BTreeMap<String, String>,
}
