//! Authenticated HTTP access to the Snyk API families.
//!
//! Wraps a [`reqwest::Client`] with the token header and the resolved
//! regional endpoints so the rest of the crate never assembles auth or
//! base URLs by hand.

use crate::tenant::ApiEndpoints;
use std::time::Duration;
use thiserror::Error;

/// Pinned version of the REST API used for target listing.
pub const REST_API_VERSION: &str = "2023-11-27~beta";

/// Pinned version of the hidden API used for target mutation.
pub const HIDDEN_API_VERSION: &str = "2023-04-02~experimental";

/// Per-request timeout. Every call blocks until it returns or hits this.
pub const API_TIMEOUT: Duration = Duration::from_secs(90);

/// Errors that can occur while constructing the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authenticated client for one Snyk organization's regional deployment.
#[derive(Debug, Clone)]
pub struct SnykClient {
    http: reqwest::Client,
    token: String,
    endpoints: ApiEndpoints,
}

impl SnykClient {
    /// Builds a client holding the API token and the endpoint triple.
    pub fn new(token: impl Into<String>, endpoints: ApiEndpoints) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(API_TIMEOUT).build()?;
        Ok(Self {
            http,
            token: token.into(),
            endpoints,
        })
    }

    /// Returns the resolved endpoint triple.
    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Starts an authenticated GET against an absolute URL.
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Authorization", format!("token {}", self.token))
    }

    /// Starts an authenticated PATCH carrying a JSON:API body.
    pub fn patch_vnd_json(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .patch(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Content-Type", "application/vnd.api+json")
    }
}
