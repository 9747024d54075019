//! Unit tests for the runner output surface.

use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn append_entry_writes_name_value_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output");

    append_entry(&path, "token", "ghs_abc").unwrap();
    append_entry(&path, "installation_id", "42").unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "token=ghs_abc\ninstallation_id=42\n");
}

#[test]
fn append_entry_appends_to_an_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output");
    fs::write(&path, "earlier=entry\n").unwrap();

    append_entry(&path, "token", "ghs_abc").unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "earlier=entry\ntoken=ghs_abc\n");
}

#[test]
fn values_with_newlines_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output");

    let error = append_entry(&path, "token", "line1\nline2").unwrap_err();
    assert!(matches!(error, Error::InvalidOutput(_)));
    assert!(!path.exists());
}

#[test]
fn names_with_an_equals_sign_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output");

    let error = append_entry(&path, "to=ken", "value").unwrap_err();
    assert!(matches!(error, Error::InvalidOutput(_)));
}

#[test]
fn set_output_without_a_runner_file_fails() {
    // GITHUB_OUTPUT is never set in the unit test environment.
    std::env::remove_var("GITHUB_OUTPUT");

    let error = set_output("token", "ghs_abc").unwrap_err();
    assert!(matches!(error, Error::MissingRunnerFile("GITHUB_OUTPUT")));
}

#[test]
fn read_state_reads_the_runner_exposed_variable() {
    std::env::set_var("STATE_token", "ghs_state");

    assert_eq!(read_state("token").as_deref(), Some("ghs_state"));

    std::env::remove_var("STATE_token");
}

#[test]
fn read_state_treats_missing_state_as_none() {
    assert!(read_state("definitely_absent").is_none());
}

#[test]
fn read_state_treats_empty_state_as_none() {
    std::env::set_var("STATE_empty", "");

    assert!(read_state("empty").is_none());

    std::env::remove_var("STATE_empty");
}
