use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod errors;
mod workflow;

use errors::Error;

/// Mint a scoped GitHub App installation access token for a workflow run
#[derive(Parser)]
#[command(name = "app-token-action")]
#[command(about = "Issue a scoped GitHub App installation token", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the installation and issue a token (the main step)
    Issue,

    /// Revoke the token persisted by an earlier issue step (the post step)
    Revoke,
}

#[tokio::main]
async fn main() {
    // Initialize logging. Keep stdout free for workflow commands; all log
    // output goes to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("APP_TOKEN_LOG"))
        .init();

    let cli = Cli::parse();
    let result: Result<(), Error> = match cli.command.unwrap_or(Commands::Issue) {
        Commands::Issue => commands::issue_cmd::execute().await,
        Commands::Revoke => commands::revoke_cmd::execute().await,
    };

    if let Err(e) = result {
        // Single reporting boundary: one primary message for the job log,
        // the full detail gated behind the debug level.
        error!("{e}");
        debug!(error = ?e, "Run failed");
        std::process::exit(1);
    }
}
