#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod client;
pub mod integrations;
pub mod migrate;
pub mod report;
pub mod runner;
pub mod targets;
pub mod tenant;

pub use client::{ClientError, SnykClient, API_TIMEOUT, HIDDEN_API_VERSION, REST_API_VERSION};
pub use integrations::{verify_org_integrations, VerifyError};
pub use migrate::{migrate_target, migrate_targets, MigrationOutcome};
pub use report::{report_dry_run, ConsoleReporter, OutcomeSink};
pub use runner::{RunSummary, Runner, RunnerConfig, RunnerError};
pub use targets::{fetch_all_targets, Origin, Target, TargetAttributes, TargetsError};
pub use tenant::{ApiEndpoints, InvalidTenant, Tenant};
