use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the action entry point.
///
/// This enum covers the failures the binary itself can produce on top of
/// the issuance flow: publishing outputs and talking to the runner's
/// communication files.
#[derive(Error, Debug)]
pub enum Error {
    /// The token issuance flow failed.
    ///
    /// The wrapped error already carries the classified failure kind and a
    /// descriptive message, so it is rendered transparently.
    #[error(transparent)]
    Token(#[from] app_token_core::Error),

    /// A value cannot be published because it does not fit the runner's
    /// single-line `name=value` file format.
    #[error("The \"{0}\" value cannot be written as a runner file entry")]
    InvalidOutput(String),

    /// The runner did not provide one of its communication files.
    ///
    /// This happens when the binary runs outside the GitHub Actions runner,
    /// where `GITHUB_OUTPUT` and `GITHUB_STATE` are not set.
    #[error("The {0} environment variable is not set; outputs cannot be published")]
    MissingRunnerFile(&'static str),

    /// Failed to append to a runner communication file.
    #[error("Failed to write to the runner file: {0}")]
    RunnerFileWrite(io::Error),
}
