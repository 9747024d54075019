//! The GitHub Actions output surface.
//!
//! The runner consumes three channels: workflow commands on stdout
//! (`::add-mask::`), the `GITHUB_OUTPUT` file for step outputs, and the
//! `GITHUB_STATE` file for values a later post step reads back (the runner
//! exposes those as `STATE_*` environment variables there).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::errors::Error;

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;

/// Registers `value` with the runner's log masker.
///
/// Must run before the value is written anywhere else so it never shows up
/// unredacted in the job log. Workflow commands only take effect on stdout;
/// all logging in this binary goes to stderr.
pub fn mask_value(value: &str) {
    println!("::add-mask::{}", value);
}

/// Publishes a step output.
pub fn set_output(name: &str, value: &str) -> Result<(), Error> {
    append_to_runner_file("GITHUB_OUTPUT", name, value)
}

/// Persists a value for the post step.
pub fn save_state(name: &str, value: &str) -> Result<(), Error> {
    append_to_runner_file("GITHUB_STATE", name, value)
}

/// Reads a value persisted with [`save_state`] by an earlier step.
///
/// The runner exposes saved state to the post step as `STATE_<name>`.
pub fn read_state(name: &str) -> Option<String> {
    std::env::var(format!("STATE_{}", name))
        .ok()
        .filter(|value| !value.is_empty())
}

fn append_to_runner_file(var: &'static str, name: &str, value: &str) -> Result<(), Error> {
    let Some(path) = std::env::var_os(var) else {
        return Err(Error::MissingRunnerFile(var));
    };
    append_entry(Path::new(&path), name, value)
}

fn append_entry(path: &Path, name: &str, value: &str) -> Result<(), Error> {
    // Single-line `name=value` entries only. Nothing this action publishes
    // can legitimately contain a newline or an `=` in the name.
    if name.contains('=') || name.contains('\n') || value.contains('\n') {
        return Err(Error::InvalidOutput(name.to_string()));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::RunnerFileWrite)?;
    writeln!(file, "{}={}", name, value).map_err(Error::RunnerFileWrite)?;
    Ok(())
}
