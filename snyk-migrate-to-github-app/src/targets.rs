//! Target listing via the Snyk REST API.
//!
//! Targets are fetched with cursor pagination: each page carries a
//! server-supplied `links.next` relative path, and the listing is exhausted
//! when that link is absent or empty. The whole listing for one origin is
//! accumulated in memory before anything else happens.

use crate::client::{SnykClient, REST_API_VERSION};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Page size requested from the listing endpoint.
const PAGE_LIMIT: u32 = 100;

/// Upper bound on pages followed in one listing.
///
/// The server is trusted to terminate the cursor chain, but a malformed or
/// looping `links.next` must not hang the run forever.
const MAX_PAGES: usize = 1000;

/// The integration family a target was discovered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// The legacy GitHub integration.
    Github,

    /// The legacy GitHub Enterprise integration.
    #[default]
    GithubEnterprise,
}

impl Origin {
    /// Returns the origin as the query-parameter value the API expects.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::GithubEnterprise => "github-enterprise",
        }
    }
}

/// Attributes of a target as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetAttributes {
    /// Human-readable name, e.g. "my-org/my-repo".
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

/// A source-control entity tracked by Snyk for a given integration.
///
/// Created by the remote service; this tool only reads and classifies it.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    /// Opaque target identifier.
    pub id: String,

    /// Target attributes.
    pub attributes: TargetAttributes,
}

/// One page of the listing response.
#[derive(Debug, Deserialize)]
struct TargetsPage {
    /// Targets on this page. A missing or empty array is tolerated.
    #[serde(default)]
    data: Vec<Target>,

    #[serde(default)]
    links: PageLinks,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinks {
    /// Server-supplied relative path of the next page, if any.
    #[serde(default)]
    next: Option<String>,
}

/// Errors that can occur while listing targets.
#[derive(Debug, Error)]
pub enum TargetsError {
    /// The listing endpoint could not be reached.
    #[error("Unable to reach Snyk to list targets for org {org_id}: {source}")]
    Transport {
        org_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The listing endpoint answered with a non-200 status.
    #[error("Unable to list targets for Snyk org: {org_id}, reason: {status}")]
    UnexpectedStatus { org_id: String, status: u16 },

    /// A page body did not parse as a targets listing.
    #[error("Malformed targets response for Snyk org: {org_id}: {source}")]
    MalformedResponse {
        org_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The cursor chain exceeded [`MAX_PAGES`] without terminating.
    #[error("Target listing for Snyk org: {org_id} did not terminate after {pages} pages")]
    PaginationRunaway { org_id: String, pages: usize },
}

/// Fetches every target of the given origin in the organization.
///
/// Follows `links.next` cursors until the server stops supplying one. The
/// returned order is the server's; it is not re-sorted.
///
/// # Errors
///
/// Returns [`TargetsError`] on transport failure, a non-200 page, an
/// unparsable page, or a cursor chain that never terminates.
pub async fn fetch_all_targets(
    client: &SnykClient,
    org_id: &str,
    origin: Origin,
) -> Result<Vec<Target>, TargetsError> {
    let rest_base = &client.endpoints().rest_base;
    let mut url = format!(
        "{rest_base}/orgs/{org_id}/targets?version={REST_API_VERSION}\
         &limit={PAGE_LIMIT}&origin={}&excludeEmpty=false",
        origin.as_str()
    );

    let mut targets = Vec::new();

    for page_number in 1.. {
        if page_number > MAX_PAGES {
            return Err(TargetsError::PaginationRunaway {
                org_id: org_id.to_string(),
                pages: MAX_PAGES,
            });
        }

        debug!(url = %url, page_number, "Fetching targets page");
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| TargetsError::Transport {
                org_id: org_id.to_string(),
                source: e,
            })?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(TargetsError::UnexpectedStatus {
                org_id: org_id.to_string(),
                status: status.as_u16(),
            });
        }

        let page: TargetsPage =
            response
                .json()
                .await
                .map_err(|e| TargetsError::MalformedResponse {
                    org_id: org_id.to_string(),
                    source: e,
                })?;

        targets.extend(page.data);

        match page.links.next.as_deref() {
            None | Some("") => break,
            // The cursor is a server-supplied relative path under the REST
            // root.
            Some(next) => url = format!("{rest_base}/{}", next.trim_start_matches('/')),
        }
    }

    info!(
        org_id,
        origin = origin.as_str(),
        count = targets.len(),
        "Target listing complete"
    );
    Ok(targets)
}
