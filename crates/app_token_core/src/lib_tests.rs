//! Unit tests for the token issuance flow.
//!
//! The flow is exercised against a mock [`AppInstallationClient`] so the
//! strategy selection and failure classification can be verified without
//! network calls.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use github_app_client::models::{AccessToken, Account, Installation};
use github_app_client::{AppInstallationClient, Error as ClientError};
use secrecy::SecretString;

use super::*;

#[derive(Default)]
struct MockClient {
    org_installation: Option<Installation>,
    repo_installation: Option<Installation>,
    fail_token_creation: bool,
    calls: Mutex<Vec<String>>,
    issued_permissions: Mutex<Option<BTreeMap<String, String>>>,
}

impl MockClient {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppInstallationClient for MockClient {
    async fn get_org_installation(
        &self,
        org: &str,
    ) -> Result<Option<Installation>, ClientError> {
        self.calls.lock().unwrap().push(format!("org:{org}"));
        Ok(self.org_installation.clone())
    }

    async fn get_repo_installation(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<Installation>, ClientError> {
        self.calls.lock().unwrap().push(format!("repo:{owner}/{repo}"));
        Ok(self.repo_installation.clone())
    }

    async fn create_installation_token(
        &self,
        installation_id: u64,
        permissions: &BTreeMap<String, String>,
    ) -> Result<AccessToken, ClientError> {
        self.calls.lock().unwrap().push(format!("token:{installation_id}"));
        if self.fail_token_creation {
            return Err(ClientError::FailedToCreateAccessToken(installation_id));
        }

        *self.issued_permissions.lock().unwrap() = Some(permissions.clone());
        Ok(AccessToken {
            token: SecretString::from("ghs_testtoken".to_string()),
            expires_at: Utc::now() + Duration::hours(1),
            permissions: permissions.clone(),
        })
    }
}

fn installation(id: u64, login: &str, account_type: &str) -> Installation {
    Installation {
        id,
        account: Account {
            id: 500,
            login: login.to_string(),
            account_type: account_type.to_string(),
        },
        repository_selection: Some("all".to_string()),
    }
}

// --- Strategy selection ---

#[test]
fn select_prefers_the_organization_when_present() {
    let strategy = ResolutionStrategy::select(Some("octo-org"), "octo-org/widgets").unwrap();

    assert_eq!(strategy, ResolutionStrategy::ByOrganization("octo-org".to_string()));
}

#[test]
fn select_uses_the_repository_when_no_organization_is_given() {
    let strategy = ResolutionStrategy::select(None, "octo-org/widgets").unwrap();

    assert_eq!(
        strategy,
        ResolutionStrategy::ByRepository {
            owner: "octo-org".to_string(),
            repo: "widgets".to_string(),
        }
    );
}

#[test]
fn select_treats_a_blank_organization_as_absent() {
    let strategy = ResolutionStrategy::select(Some("   "), "octo-org/widgets").unwrap();

    assert!(matches!(strategy, ResolutionStrategy::ByRepository { .. }));
}

#[test]
fn select_requires_the_repository_identifier_even_with_an_organization() {
    let error = ResolutionStrategy::select(Some("octo-org"), "  ").unwrap_err();

    assert!(matches!(error, Error::Configuration(_)));
    assert!(error.to_string().contains("GITHUB_REPOSITORY"));
}

#[test]
fn select_rejects_a_repository_identifier_without_a_slash() {
    let error = ResolutionStrategy::select(None, "justaname").unwrap_err();

    assert!(matches!(error, Error::Configuration(_)));
    assert!(error.to_string().contains("<owner>/<repo>"));
}

// --- Issuance flow ---

#[tokio::test]
async fn organization_strategy_never_touches_the_repository_lookup() {
    let client = MockClient {
        org_installation: Some(installation(42, "octo-org", "Organization")),
        ..Default::default()
    };

    let issued = issue_token(&client, Some("octo-org"), "octo-org/widgets", "contents:write")
        .await
        .unwrap();

    assert_eq!(issued.installation_id, 42);
    let calls = client.calls();
    assert!(calls.contains(&"org:octo-org".to_string()));
    assert!(!calls.iter().any(|call| call.starts_with("repo:")));

    let scoped = client.issued_permissions.lock().unwrap().clone().unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped["contents"], "write");
}

#[tokio::test]
async fn repository_strategy_never_touches_the_organization_lookup() {
    let client = MockClient {
        repo_installation: Some(installation(7, "octo-org", "Organization")),
        ..Default::default()
    };

    let issued = issue_token(&client, None, "octo-org/widgets", "")
        .await
        .unwrap();

    assert_eq!(issued.installation_id, 7);
    let calls = client.calls();
    assert!(calls.contains(&"repo:octo-org/widgets".to_string()));
    assert!(!calls.iter().any(|call| call.starts_with("org:")));
}

#[tokio::test]
async fn empty_permission_string_requests_the_full_grant() {
    let client = MockClient {
        repo_installation: Some(installation(7, "octo-org", "Organization")),
        ..Default::default()
    };

    issue_token(&client, None, "octo-org/widgets", "").await.unwrap();

    let scoped = client.issued_permissions.lock().unwrap().clone().unwrap();
    assert!(scoped.is_empty());
}

#[tokio::test]
async fn missing_organization_installation_prevents_token_issuance() {
    let client = MockClient::default();

    let error = issue_token(&client, Some("octo-org"), "octo-org/widgets", "")
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Resolution(_)));
    assert!(error
        .to_string()
        .contains("not installed on organization \"octo-org\""));
    assert!(!client.calls().iter().any(|call| call.starts_with("token:")));
}

#[tokio::test]
async fn missing_repository_installation_prevents_token_issuance() {
    let client = MockClient::default();

    let error = issue_token(&client, None, "octo-org/widgets", "")
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Resolution(_)));
    assert!(error
        .to_string()
        .contains("not installed on repository \"octo-org/widgets\""));
    assert!(!client.calls().iter().any(|call| call.starts_with("token:")));
}

#[tokio::test]
async fn malformed_permissions_abort_before_the_token_exchange() {
    let client = MockClient {
        org_installation: Some(installation(42, "octo-org", "Organization")),
        ..Default::default()
    };

    let error = issue_token(
        &client,
        Some("octo-org"),
        "octo-org/widgets",
        "pull-requests:read",
    )
    .await
    .unwrap_err();

    assert!(matches!(error, Error::Validation(_)));
    assert!(!client.calls().iter().any(|call| call.starts_with("token:")));
}

#[tokio::test]
async fn missing_repository_identifier_fails_before_any_lookup() {
    let client = MockClient::default();

    let error = issue_token(&client, None, "", "").await.unwrap_err();

    assert!(matches!(error, Error::Configuration(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn token_exchange_failure_is_classified_as_issuance() {
    let client = MockClient {
        org_installation: Some(installation(42, "octo-org", "Organization")),
        fail_token_creation: true,
        ..Default::default()
    };

    let error = issue_token(&client, Some("octo-org"), "octo-org/widgets", "")
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Issuance(_)));
}
