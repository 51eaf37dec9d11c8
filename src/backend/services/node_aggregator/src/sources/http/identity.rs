use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::models::node::{EnsIdentity, Profile};
use crate::sources::traits::IdentitySource;
use crate::utils::errors::{Result, SourceError};

/// Identity resolver over the naming-service and profile-store gateways.
/// Every lookup is scoped to a single node; failures here are recovered by
/// the pipeline with `None` fields and never abort sibling nodes.
pub struct IdentityApi {
    client: reqwest::Client,
    name_api_url: String,
    profile_api_url: String,
}

impl IdentityApi {
    pub fn new(
        client: reqwest::Client,
        name_api_url: impl Into<String>,
        profile_api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name_api_url: name_api_url.into(),
            profile_api_url: profile_api_url.into(),
        }
    }
}

#[async_trait]
impl IdentitySource for IdentityApi {
    async fn resolve(&self, address: &str) -> Result<EnsIdentity> {
        let url = format!(
            "{}/resolve/{address}",
            self.name_api_url.trim_end_matches('/')
        );
        debug!(%address, "reverse-name lookup");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::resolution(address, e))?;

        // an unnamed address is a normal outcome, not a failure
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(EnsIdentity::default());
        }

        let raw: RawIdentity = response
            .json()
            .await
            .map_err(|e| SourceError::resolution(address, e))?;

        Ok(EnsIdentity {
            name: raw.name,
            url: raw.url,
            avatar: raw.avatar,
            description: raw.description,
            twitter: raw.twitter,
            github: raw.github,
        })
    }

    async fn profile(&self, address: &str, namespace: &str) -> Result<Option<Profile>> {
        let url = format!(
            "{}?address={address}&namespace={namespace}",
            self.profile_api_url.trim_end_matches('/')
        );
        debug!(%address, %namespace, "profile lookup");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::resolution(address, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let profile: Profile = response
            .json()
            .await
            .map_err(|e| SourceError::resolution(address, e))?;
        Ok(Some(profile))
    }
}

// Text records exposed by the naming gateway; all optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdentity {
    name: Option<String>,
    url: Option<String>,
    avatar: Option<String>,
    description: Option<String>,
    #[serde(rename = "com.twitter", alias = "twitter")]
    twitter: Option<String>,
    #[serde(rename = "com.github", alias = "github")]
    github: Option<String>,
}
