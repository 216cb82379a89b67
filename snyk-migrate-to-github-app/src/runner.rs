//! Orchestrates a full migration run.
//!
//! Control flow: resolve tenant endpoints, verify the integration gate,
//! accumulate targets, then either report them (dry run) or migrate each
//! one. Fully sequential; one request in flight at a time.

use crate::client::{ClientError, SnykClient};
use crate::integrations::{verify_org_integrations, VerifyError};
use crate::migrate::{migrate_targets, MigrationOutcome};
use crate::report::{report_dry_run, OutcomeSink};
use crate::targets::{fetch_all_targets, Origin, TargetsError};
use crate::tenant::{ApiEndpoints, Tenant};
use thiserror::Error;
use tracing::info;

/// Configuration for one migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// ID of the Snyk organization whose targets are migrated.
    org_id: String,
    /// Snyk API token.
    token: String,
    /// Regional deployment the run talks to.
    tenant: Tenant,
    /// Whether to list targets without migrating them.
    dry_run: bool,
    /// Whether to also migrate plain `github` targets in addition to
    /// `github-enterprise` ones.
    include_github_targets: bool,
    /// Endpoint override used by tests to aim at a mock server.
    endpoints: Option<ApiEndpoints>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(
        org_id: String,
        token: String,
        tenant: Tenant,
        dry_run: bool,
        include_github_targets: bool,
    ) -> Self {
        Self {
            org_id,
            token,
            tenant,
            dry_run,
            include_github_targets,
            endpoints: None,
        }
    }

    /// Overrides the tenant-resolved endpoints with explicit ones.
    pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Returns the organization ID.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Returns the selected tenant.
    pub fn tenant(&self) -> Tenant {
        self.tenant
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns whether plain `github` targets are included.
    pub fn include_github_targets(&self) -> bool {
        self.include_github_targets
    }
}

/// Fatal errors that abort a run before or during target accumulation.
///
/// Per-target migration outcomes are never errors; they flow through the
/// sink instead.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// HTTP client construction errors.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Integration verification gate failures.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Target listing failures.
    #[error(transparent)]
    Targets(#[from] TargetsError),
}

/// Tallies of a completed run.
///
/// The console keeps the tool's historical output shape, which only prints a
/// total in dry-run mode; these counts exist so the caller can pick an exit
/// code.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Number of targets accumulated across all listings.
    pub targets_discovered: usize,

    /// Number of targets migrated.
    pub migrated: usize,

    /// Number of targets that were already on the Cloud App integration.
    pub already_migrated: usize,

    /// Number of targets that could not be migrated.
    pub failed: usize,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with one target's outcome.
    pub fn record_outcome(&mut self, outcome: &MigrationOutcome) {
        match outcome {
            MigrationOutcome::Migrated => self.migrated += 1,
            MigrationOutcome::AlreadyMigrated => self.already_migrated += 1,
            MigrationOutcome::Failed { .. } | MigrationOutcome::Unreachable { .. } => {
                self.failed += 1
            }
        }
    }

    /// Returns true if any per-target migration failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Orchestrates verification, listing and migration for one organization.
pub struct Runner {
    config: RunnerConfig,
    client: SnykClient,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let endpoints = config
            .endpoints
            .clone()
            .unwrap_or_else(|| config.tenant.endpoints());
        let client = SnykClient::new(config.token.clone(), endpoints)?;
        Ok(Self { config, client })
    }

    /// Executes the full run against the configured organization.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the verification gate or target listing
    /// fails; individual migration failures are reported through the sink
    /// and tallied in the summary instead.
    pub async fn run(&self, sink: &mut dyn OutcomeSink) -> Result<RunSummary, RunnerError> {
        let org_id = &self.config.org_id;
        let mut summary = RunSummary::new(self.config.dry_run);

        info!(org_id, tenant = %self.config.tenant, "Verifying org integrations");
        verify_org_integrations(&self.client, org_id).await?;

        let mut targets = fetch_all_targets(&self.client, org_id, Origin::GithubEnterprise).await?;
        if self.config.include_github_targets {
            targets.extend(fetch_all_targets(&self.client, org_id, Origin::Github).await?);
        }

        info!(org_id, count = targets.len(), "Accumulated targets");
        summary.targets_discovered = targets.len();

        if self.config.dry_run {
            report_dry_run(&targets, sink);
            return Ok(summary);
        }

        let outcomes = migrate_targets(&self.client, org_id, &targets, sink).await;
        for outcome in &outcomes {
            summary.record_outcome(outcome);
        }

        Ok(summary)
    }
}
