//! skattekort-server — standalone lookup server.
//!
//! Reads config from env vars:
//!   BIND_ADDR                           — listen address (default: 0.0.0.0:8080)
//!   LOCAL_MODE                          — "true"/"1" disables auth + token exchange
//!   JWT_SECRET                          — bearer-token HMAC secret (required unless local)
//!   SOKOS_SKATTEKORT_PERSON_API         — legacy upstream base URL
//!   SOKOS_SKATTEKORT_PERSON_API_AUDIENCE
//!   SOKOS_SKATTEKORT_API                — current upstream base URL
//!   SOKOS_SKATTEKORT_API_AUDIENCE
//!   AZURE_OPENID_CONFIG_TOKEN_ENDPOINT  — OBO token endpoint (required unless local)
//!   AZURE_APP_CLIENT_ID / AZURE_APP_CLIENT_SECRET

use std::sync::Arc;

use anyhow::Context;
use skattekort_client::{
    AzureOboExchanger, HttpSkattekortClient, StaticTokenExchanger, TokenExchanger,
};
use skattekort_server::config::ServerConfig;
use skattekort_server::middleware::auth::AuthConfig;
use skattekort_server::router::build_router;
use skattekort_server::state::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skattekort_server=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let auth = if config.local_mode {
        tracing::warn!("running in local mode, bearer-token validation disabled");
        AuthConfig::local()
    } else {
        let secret = config
            .jwt_secret
            .as_deref()
            .context("JWT_SECRET must be set")?;
        let mut auth = AuthConfig::from_secret(secret.as_bytes());
        if let Some(azure) = &config.azure {
            auth = auth.with_audience(&azure.client_id);
        }
        auth
    };

    let tokens: Arc<dyn TokenExchanger> = match &config.azure {
        Some(azure) => Arc::new(AzureOboExchanger::new(
            azure.token_endpoint.clone(),
            azure.client_id.clone(),
            azure.client_secret.clone(),
        )),
        None => Arc::new(StaticTokenExchanger),
    };

    let state = AppState {
        api: Arc::new(HttpSkattekortClient::new(config.upstream.clone())),
        tokens,
        upstream: config.upstream.clone(),
        local_mode: config.local_mode,
    };

    let app = build_router(state, auth);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
