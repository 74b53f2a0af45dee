//! Upstream skattekort API client.
//!
//! [`SkattekortApi`] is the sole boundary between the server and the two
//! upstream tax-card APIs. [`HttpSkattekortClient`] is the production
//! implementation; tests substitute their own.

pub mod http;
pub mod token;

use async_trait::async_trait;
use serde_json::Value;
use skattekort_core::error::{ConfigError, UpstreamError};
use skattekort_core::query::{ApiVariant, SkattekortQuery};
use thiserror::Error;

pub use http::HttpSkattekortClient;
pub use token::{AzureOboExchanger, StaticTokenExchanger, TokenExchanger};

/// Failure modes of a single upstream lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[async_trait]
pub trait SkattekortApi: Send + Sync {
    /// Issue the single outbound lookup against the upstream selected by
    /// the query. One attempt; no retries.
    async fn hent_skattekort(
        &self,
        query: &SkattekortQuery,
        token: &str,
    ) -> Result<Value, FetchError>;
}

/// Base URL and OBO audience for one upstream variant.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub base_url: String,
    pub audience: Option<String>,
}

/// The two selectable upstreams. Either may be absent in a deployment;
/// absence only surfaces once that variant is actually selected.
#[derive(Debug, Clone, Default)]
pub struct UpstreamConfig {
    pub legacy: Option<Endpoint>,
    pub current: Option<Endpoint>,
}

impl UpstreamConfig {
    pub fn endpoint_for(&self, variant: ApiVariant) -> Result<&Endpoint, ConfigError> {
        let endpoint = match variant {
            ApiVariant::Legacy => self.legacy.as_ref(),
            ApiVariant::Current => self.current.as_ref(),
        };
        endpoint.ok_or(ConfigError::MissingBaseUrl(variant))
    }

    pub fn audience_for(&self, variant: ApiVariant) -> Result<&str, ConfigError> {
        self.endpoint_for(variant)?
            .audience
            .as_deref()
            .ok_or(ConfigError::MissingAudience(variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UpstreamConfig {
        UpstreamConfig {
            legacy: Some(Endpoint {
                base_url: "http://legacy".into(),
                audience: Some("local:okonomi:sokos-skattekort-person".into()),
            }),
            current: Some(Endpoint {
                base_url: "http://current".into(),
                audience: None,
            }),
        }
    }

    #[test]
    fn selects_endpoint_by_variant() {
        let config = config();
        assert_eq!(
            config.endpoint_for(ApiVariant::Legacy).unwrap().base_url,
            "http://legacy"
        );
        assert_eq!(
            config.endpoint_for(ApiVariant::Current).unwrap().base_url,
            "http://current"
        );
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let config = UpstreamConfig::default();
        assert_eq!(
            config.endpoint_for(ApiVariant::Current).unwrap_err(),
            ConfigError::MissingBaseUrl(ApiVariant::Current)
        );
    }

    #[test]
    fn missing_audience_is_distinct_from_missing_base_url() {
        let config = config();
        assert_eq!(
            config.audience_for(ApiVariant::Current).unwrap_err(),
            ConfigError::MissingAudience(ApiVariant::Current)
        );
    }
}
