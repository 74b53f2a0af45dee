//! Environment-driven configuration.
//!
//! Read once in `main` and injected from there; nothing below the router
//! reads the environment.

use anyhow::{Context, Result};
use skattekort_client::{Endpoint, UpstreamConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub local_mode: bool,
    pub jwt_secret: Option<String>,
    pub upstream: UpstreamConfig,
    pub azure: Option<AzureConfig>,
}

#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let local_mode = std::env::var("LOCAL_MODE").is_ok_and(|v| v == "true" || v == "1");
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

        // Endpoint/audience absence is tolerated here; it only surfaces as
        // a configuration error once that variant is actually queried.
        let upstream = UpstreamConfig {
            legacy: endpoint_from_env(
                "SOKOS_SKATTEKORT_PERSON_API",
                "SOKOS_SKATTEKORT_PERSON_API_AUDIENCE",
            ),
            current: endpoint_from_env("SOKOS_SKATTEKORT_API", "SOKOS_SKATTEKORT_API_AUDIENCE"),
        };

        let jwt_secret = std::env::var("JWT_SECRET").ok();
        if !local_mode && jwt_secret.is_none() {
            anyhow::bail!("JWT_SECRET must be set outside local mode");
        }

        let azure = if local_mode {
            None
        } else {
            Some(AzureConfig {
                token_endpoint: std::env::var("AZURE_OPENID_CONFIG_TOKEN_ENDPOINT")
                    .context("AZURE_OPENID_CONFIG_TOKEN_ENDPOINT must be set outside local mode")?,
                client_id: std::env::var("AZURE_APP_CLIENT_ID")
                    .context("AZURE_APP_CLIENT_ID must be set outside local mode")?,
                client_secret: std::env::var("AZURE_APP_CLIENT_SECRET")
                    .context("AZURE_APP_CLIENT_SECRET must be set outside local mode")?,
            })
        };

        Ok(Self {
            bind_addr,
            local_mode,
            jwt_secret,
            upstream,
            azure,
        })
    }
}

fn endpoint_from_env(base_url_var: &str, audience_var: &str) -> Option<Endpoint> {
    let base_url = std::env::var(base_url_var).ok()?;
    Some(Endpoint {
        base_url: base_url.trim_end_matches('/').to_string(),
        audience: std::env::var(audience_var).ok(),
    })
}
