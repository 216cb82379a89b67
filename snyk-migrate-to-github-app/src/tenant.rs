//! Regional tenant selection.
//!
//! Snyk runs regional deployments of its platform; the tenant selector picks
//! which one every API call goes to. Resolving a tenant is a pure function —
//! no network access happens here.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a tenant selector is not one of the known regions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown tenant '{0}', expected one of: \"\", \"au\", \"eu\"")]
pub struct InvalidTenant(pub String);

/// A regional deployment of the Snyk platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tenant {
    /// The default (US) deployment.
    #[default]
    Default,

    /// The Australian deployment.
    Au,

    /// The European deployment.
    Eu,
}

impl FromStr for Tenant {
    type Err = InvalidTenant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Default),
            "au" => Ok(Self::Au),
            "eu" => Ok(Self::Eu),
            other => Err(InvalidTenant(other.to_string())),
        }
    }
}

impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Au => write!(f, "au"),
            Self::Eu => write!(f, "eu"),
        }
    }
}

/// Base URLs for the three Snyk API families of one regional deployment.
///
/// All three roots always belong to the same region; mixing regions within a
/// run is not possible by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Root of the legacy v1 API (integrations listing).
    pub v1_base: String,

    /// Root of the REST API (target listing).
    pub rest_base: String,

    /// Root of the hidden/experimental API (target mutation).
    pub hidden_base: String,
}

impl ApiEndpoints {
    /// Builds an endpoint triple with all three roots pointed at explicit
    /// URLs. Used by tests to aim the client at a mock server.
    pub fn new(
        v1_base: impl Into<String>,
        rest_base: impl Into<String>,
        hidden_base: impl Into<String>,
    ) -> Self {
        Self {
            v1_base: v1_base.into(),
            rest_base: rest_base.into(),
            hidden_base: hidden_base.into(),
        }
    }
}

impl Tenant {
    /// Resolves the endpoint triple for this tenant.
    #[must_use]
    pub fn endpoints(&self) -> ApiEndpoints {
        match self {
            Self::Default => ApiEndpoints::new(
                "https://snyk.io/api/v1",
                "https://api.snyk.io/rest",
                "https://api.snyk.io/hidden",
            ),
            Self::Au => ApiEndpoints::new(
                "https://api.au.snyk.io/v1",
                "https://api.au.snyk.io/rest",
                "https://api.au.snyk.io/hidden",
            ),
            Self::Eu => ApiEndpoints::new(
                "https://api.eu.snyk.io/v1",
                "https://api.eu.snyk.io/rest",
                "https://api.eu.snyk.io/hidden",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tenants() {
        assert_eq!("".parse::<Tenant>().unwrap(), Tenant::Default);
        assert_eq!("au".parse::<Tenant>().unwrap(), Tenant::Au);
        assert_eq!("eu".parse::<Tenant>().unwrap(), Tenant::Eu);
    }

    #[test]
    fn test_parse_rejects_unknown_tenant() {
        let err = "uk".parse::<Tenant>().unwrap_err();
        assert_eq!(err, InvalidTenant("uk".to_string()));
    }

    #[test]
    fn test_endpoints_are_fixed_and_distinct() {
        let triples = [
            Tenant::Default.endpoints(),
            Tenant::Au.endpoints(),
            Tenant::Eu.endpoints(),
        ];

        for (i, a) in triples.iter().enumerate() {
            for (j, b) in triples.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }

        // Resolution is deterministic.
        assert_eq!(Tenant::Au.endpoints(), Tenant::Au.endpoints());
    }

    #[test]
    fn test_endpoints_share_region() {
        let au = Tenant::Au.endpoints();
        assert!(au.v1_base.contains(".au.snyk.io"));
        assert!(au.rest_base.contains(".au.snyk.io"));
        assert!(au.hidden_base.contains(".au.snyk.io"));
    }
}
