//! CLI for migrating Snyk targets to the GitHub Cloud App integration.
//!
//! Verifies the organization's integrations, enumerates GitHub and GitHub
//! Enterprise targets, then either reports them (dry run) or migrates each
//! one, printing a per-target outcome line.

use clap::Parser;
use snyk_migrate_to_github_app::{ConsoleReporter, Runner, RunnerConfig, RunnerError, Tenant};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Migrate Snyk targets from the GitHub or GitHub Enterprise integration to the GitHub Cloud App integration.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ID of the Snyk Organization whose targets should be migrated.
    #[arg(env = "SNYK_ORG_ID")]
    org_id: String,

    /// Snyk API token.
    #[arg(env = "SNYK_TOKEN", hide_env_values = true)]
    snyk_token: String,

    /// Regional tenant: "" (default/US), "au" or "eu".
    #[arg(long, default_value = "")]
    tenant: Tenant,

    /// Print names of targets to be migrated without migrating.
    #[arg(long)]
    dry_run: bool,

    /// Migrate both github and github-enterprise targets, default is only github-enterprise.
    #[arg(long)]
    include_github_targets: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Migration run aborted");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<snyk_migrate_to_github_app::RunSummary, RunnerError> {
    let config = RunnerConfig::new(
        args.org_id,
        args.snyk_token,
        args.tenant,
        args.dry_run,
        args.include_github_targets,
    );
    let runner = Runner::new(config)?;
    runner.run(&mut ConsoleReporter).await
}
