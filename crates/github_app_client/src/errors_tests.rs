//! Unit tests for the github_app_client error type.

use super::*;

#[test]
fn auth_error_includes_the_detail_message() {
    let error = Error::AuthError("bad private key".to_string());

    assert!(error.to_string().contains("bad private key"));
}

#[test]
fn failed_token_creation_names_the_installation() {
    let error = Error::FailedToCreateAccessToken(99);

    assert_eq!(
        error.to_string(),
        "Failed to create an installation access token for installation 99"
    );
}

#[test]
fn deserialization_error_wraps_the_serde_source() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = Error::from(source);

    assert!(error.to_string().starts_with("Failed to deserialize"));
}

#[test]
fn revocation_rejection_explains_the_cause() {
    let error = Error::RevocationRejected;

    assert!(error.to_string().contains("invalid or already revoked"));
}
