//! Unit tests for the issuance error classification.

use super::*;

#[test]
fn configuration_errors_carry_a_kind_prefix() {
    let error = Error::Configuration("GITHUB_REPOSITORY is missing".to_string());

    assert_eq!(
        error.to_string(),
        "Configuration error: GITHUB_REPOSITORY is missing"
    );
}

#[test]
fn authentication_errors_carry_a_kind_prefix() {
    let error = Error::Authentication("private key rejected".to_string());

    assert_eq!(error.to_string(), "Authentication error: private key rejected");
}

#[test]
fn resolution_errors_render_the_message_as_is() {
    let error =
        Error::Resolution("The GitHub App is not installed on organization \"octo\".".to_string());

    assert_eq!(
        error.to_string(),
        "The GitHub App is not installed on organization \"octo\"."
    );
}

#[test]
fn validation_errors_render_the_raw_parser_diagnostic() {
    let error = Error::Validation("Invalid permission entry \"bogus\".".to_string());

    assert_eq!(error.to_string(), "Invalid permission entry \"bogus\".");
}

#[test]
fn issuance_errors_pass_the_client_message_through() {
    let error = Error::from(github_app_client::Error::FailedToCreateAccessToken(42));

    assert!(error.to_string().contains("installation 42"));
}
