//! Pre-migration verification of organization integrations.
//!
//! Before any target is listed or mutated, the organization must have at
//! least one legacy GitHub integration to migrate *from* and the GitHub
//! Cloud App integration to migrate *to*. This check runs once against the
//! legacy v1 API and gates the whole run.

use crate::client::SnykClient;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

/// Integration type name of the GitHub Cloud App.
pub const GITHUB_CLOUD_APP: &str = "github-cloud-app";

/// Integration type name of the legacy GitHub integration.
pub const GITHUB: &str = "github";

/// Integration type name of the legacy GitHub Enterprise integration.
pub const GITHUB_ENTERPRISE: &str = "github-enterprise";

/// Errors that fail the verification gate. All of them abort the run.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The integrations endpoint could not be reached at all.
    #[error("Unable to reach Snyk to retrieve integrations for org {org_id}: {source}")]
    Transport {
        org_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The integrations endpoint answered with a non-200 status.
    #[error("Unable to retrieve integrations for Snyk org: {org_id}, reason: {status}")]
    UnexpectedStatus { org_id: String, status: u16 },

    /// The response body was not the expected JSON mapping.
    #[error("Malformed integrations response for Snyk org: {org_id}: {source}")]
    MalformedResponse {
        org_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// Neither legacy GitHub integration type is configured.
    #[error("No GitHub or GitHub Enterprise integration detected for Snyk Org: {org_id}")]
    NoLegacyGithubIntegration { org_id: String },

    /// The Cloud App integration is not configured yet.
    #[error(
        "No GitHub Cloud App integration detected for Snyk Org: {org_id}, \
         please set up before migrating GitHub or GitHub Enterprise targets"
    )]
    NoCloudAppIntegration { org_id: String },
}

/// Verifies that the organization is ready for migration.
///
/// Issues one GET to `{v1}/org/{org_id}/integrations` and checks the
/// configured integration-type names. The metadata values are ignored; only
/// the keys matter.
///
/// The gate passes when at least one of `github` / `github-enterprise` is
/// present **and** `github-cloud-app` is present.
///
/// # Errors
///
/// Returns [`VerifyError`] on transport failure, a non-200 response, an
/// unparsable body, or a missing integration. Never panics.
pub async fn verify_org_integrations(client: &SnykClient, org_id: &str) -> Result<(), VerifyError> {
    let url = format!("{}/org/{}/integrations", client.endpoints().v1_base, org_id);
    debug!(url = %url, "Fetching org integrations");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| VerifyError::Transport {
            org_id: org_id.to_string(),
            source: e,
        })?;

    let status = response.status();
    if status.as_u16() != 200 {
        return Err(VerifyError::UnexpectedStatus {
            org_id: org_id.to_string(),
            status: status.as_u16(),
        });
    }

    // Mapping of integration-type name to integration metadata; only the
    // keys are inspected.
    let integrations: HashMap<String, Value> =
        response
            .json()
            .await
            .map_err(|e| VerifyError::MalformedResponse {
                org_id: org_id.to_string(),
                source: e,
            })?;

    if !integrations.contains_key(GITHUB_ENTERPRISE) && !integrations.contains_key(GITHUB) {
        return Err(VerifyError::NoLegacyGithubIntegration {
            org_id: org_id.to_string(),
        });
    }

    if !integrations.contains_key(GITHUB_CLOUD_APP) {
        return Err(VerifyError::NoCloudAppIntegration {
            org_id: org_id.to_string(),
        });
    }

    info!(org_id, "Org integrations verified");
    Ok(())
}
