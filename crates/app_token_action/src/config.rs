//! Input handling for the action entry point.
//!
//! Inputs arrive as `INPUT_*` environment variables, the convention the
//! GitHub Actions runner uses to pass declared inputs to a step. The
//! repository identifier is ambient: it comes from `GITHUB_REPOSITORY`
//! rather than from a declared input, and is validated later by the
//! issuance flow.

use app_token_core::Error;
use github_app_client::ClientOptions;
use secrecy::SecretString;
use url::Url;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

const INPUT_APPLICATION_ID: &str = "INPUT_APPLICATION_ID";
const INPUT_APPLICATION_PRIVATE_KEY: &str = "INPUT_APPLICATION_PRIVATE_KEY";
const INPUT_GITHUB_API_BASE_URL: &str = "INPUT_GITHUB_API_BASE_URL";
const INPUT_HTTPS_PROXY: &str = "INPUT_HTTPS_PROXY";
const INPUT_IGNORE_ENVIRONMENT_PROXY: &str = "INPUT_IGNORE_ENVIRONMENT_PROXY";
const INPUT_ORGANIZATION: &str = "INPUT_ORGANIZATION";
const INPUT_PERMISSIONS: &str = "INPUT_PERMISSIONS";
const INPUT_REVOKE_TOKEN: &str = "INPUT_REVOKE_TOKEN";

const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";

/// Fully resolved configuration for one run.
#[derive(Debug)]
pub struct Config {
    /// The GitHub App id.
    pub app_id: u64,
    /// The App's RSA private key in PEM format.
    pub private_key: SecretString,
    /// API endpoint override (GitHub Enterprise Server support).
    pub api_base_url: Option<Url>,
    /// Outbound proxy, resolved from the input and the ambient environment.
    pub proxy: Option<Url>,
    /// Organization to resolve the installation on, when given.
    pub organization: Option<String>,
    /// Raw permission specification string; empty means full grant.
    pub permissions: String,
    /// Whether the issued token should be persisted for the post step to
    /// revoke.
    pub revoke_token: bool,
    /// Ambient `"owner/repo"` identifier; may be empty, the flow validates it.
    pub repository: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Reads the configuration through the given variable lookup.
    ///
    /// The lookup is injected so tests can supply a fixed environment
    /// without touching process-wide state.
    ///
    /// # Errors
    ///
    /// Returns an `Error::Configuration` when a required input is missing
    /// or a value cannot be parsed.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let raw_app_id = required(lookup, INPUT_APPLICATION_ID, "application_id")?;
        let app_id = raw_app_id.parse::<u64>().map_err(|_| {
            Error::Configuration(format!(
                "The \"application_id\" input must be a numeric GitHub App id, got \"{raw_app_id}\""
            ))
        })?;

        let private_key = required(
            lookup,
            INPUT_APPLICATION_PRIVATE_KEY,
            "application_private_key",
        )?;

        let api_base_url = optional(lookup, INPUT_GITHUB_API_BASE_URL)
            .map(|raw| parse_url(&raw, "github_api_base_url"))
            .transpose()?;

        let ignore_environment_proxy = match optional(lookup, INPUT_IGNORE_ENVIRONMENT_PROXY) {
            Some(raw) => parse_bool(&raw, "ignore_environment_proxy")?,
            None => false,
        };
        let proxy = effective_proxy(lookup, ignore_environment_proxy)?;

        let revoke_token = match optional(lookup, INPUT_REVOKE_TOKEN) {
            Some(raw) => parse_bool(&raw, "revoke_token")?,
            None => false,
        };

        Ok(Self {
            app_id,
            private_key: SecretString::from(private_key),
            api_base_url,
            proxy,
            organization: optional(lookup, INPUT_ORGANIZATION),
            permissions: optional(lookup, INPUT_PERMISSIONS).unwrap_or_default(),
            revoke_token,
            repository: lookup(GITHUB_REPOSITORY).unwrap_or_default(),
        })
    }

    /// Connection options for the GitHub client.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_base_url.clone(),
            proxy: self.proxy.clone(),
        }
    }
}

fn required(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &str,
    input: &str,
) -> Result<String, Error> {
    optional(lookup, var)
        .ok_or_else(|| Error::Configuration(format!("The \"{input}\" input is required")))
}

/// A blank value counts as absent; the runner passes empty strings for
/// inputs that were not set in the workflow file.
fn optional(lookup: &dyn Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(raw: &str, input: &str) -> Result<bool, Error> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "The \"{input}\" input must be a boolean, got \"{raw}\""
        ))),
    }
}

fn parse_url(raw: &str, input: &str) -> Result<Url, Error> {
    Url::parse(raw).map_err(|e| {
        Error::Configuration(format!("The \"{input}\" input is not a valid URL: {e}"))
    })
}

/// Resolves the proxy to use for outbound API calls.
///
/// An explicit `https_proxy` input wins over the ambient `HTTPS_PROXY` /
/// `https_proxy` variables. `ignore_environment_proxy` suppresses the
/// ambient lookup only; it never affects the explicit input.
fn effective_proxy(
    lookup: &dyn Fn(&str) -> Option<String>,
    ignore_environment: bool,
) -> Result<Option<Url>, Error> {
    if let Some(raw) = optional(lookup, INPUT_HTTPS_PROXY) {
        return parse_url(&raw, "https_proxy").map(Some);
    }

    if ignore_environment {
        return Ok(None);
    }

    let ambient = optional(lookup, "HTTPS_PROXY").or_else(|| optional(lookup, "https_proxy"));
    match ambient {
        Some(raw) => parse_url(&raw, "https_proxy").map(Some),
        None => Ok(None),
    }
}
