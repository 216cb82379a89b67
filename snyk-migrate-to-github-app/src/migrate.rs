//! Per-target migration to the GitHub Cloud App integration.
//!
//! Each target gets exactly one PATCH against the hidden API, and the HTTP
//! outcome is classified into a [`MigrationOutcome`]. One target's outcome
//! never affects another's; the batch always runs to the end.

use crate::client::{SnykClient, HIDDEN_API_VERSION};
use crate::report::OutcomeSink;
use crate::targets::Target;
use serde_json::json;
use tracing::debug;

/// Integration type targets are migrated to.
pub const CLOUD_APP_SOURCE_TYPE: &str = "github-cloud-app";

/// Classified result of one target's migration attempt.
///
/// Ephemeral: produced per target, handed to the sink, never aggregated in
/// live-migration mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The server accepted the mutation (200).
    Migrated,

    /// The target was already on the Cloud App integration (409). An
    /// informational no-op, not an error.
    AlreadyMigrated,

    /// The server refused the mutation with any other status.
    Failed { status: u16 },

    /// The mutation request never reached the server. Reported like any
    /// other per-target failure; the batch continues.
    Unreachable { error: String },
}

/// Migrates one target, classifying the HTTP outcome.
///
/// Never returns an error: every possible result, including a transport
/// failure, maps onto a [`MigrationOutcome`].
pub async fn migrate_target(client: &SnykClient, org_id: &str, target: &Target) -> MigrationOutcome {
    let url = format!(
        "{}/orgs/{}/targets/{}?version={HIDDEN_API_VERSION}",
        client.endpoints().hidden_base,
        org_id,
        target.id
    );

    let body = json!({
        "data": {
            "id": target.id,
            "attributes": { "source_type": CLOUD_APP_SOURCE_TYPE },
        }
    });

    debug!(url = %url, target_id = %target.id, "Migrating target");
    let response = match client.patch_vnd_json(&url).json(&body).send().await {
        Ok(response) => response,
        Err(e) => {
            return MigrationOutcome::Unreachable {
                error: e.to_string(),
            }
        }
    };

    match response.status().as_u16() {
        200 => MigrationOutcome::Migrated,
        409 => MigrationOutcome::AlreadyMigrated,
        status => MigrationOutcome::Failed { status },
    }
}

/// Migrates every accumulated target, in iteration order.
///
/// Emits one outcome per target through the sink as it happens and continues
/// regardless of individual failures. No retry, no backoff. The collected
/// outcomes are returned for exit-code selection; nothing further is printed
/// here.
pub async fn migrate_targets(
    client: &SnykClient,
    org_id: &str,
    targets: &[Target],
    sink: &mut dyn OutcomeSink,
) -> Vec<MigrationOutcome> {
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = migrate_target(client, org_id, target).await;
        sink.migration_outcome(target, &outcome);
        outcomes.push(outcome);
    }
    outcomes
}
