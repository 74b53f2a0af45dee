//! Delegated (on-behalf-of) token exchange.
//!
//! The session token of the operator is exchanged for a service token
//! scoped to the audience of the selected upstream.

use async_trait::async_trait;
use serde::Deserialize;
use skattekort_core::error::TokenError;

/// Placeholder handed out when running without an identity provider.
pub const LOCAL_TOKEN: &str = "fake-token";

#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn obo_token(&self, user_token: &str, audience: &str) -> Result<String, TokenError>;
}

/// Local/dev short-circuit: no exchange, fixed placeholder token.
pub struct StaticTokenExchanger;

#[async_trait]
impl TokenExchanger for StaticTokenExchanger {
    async fn obo_token(&self, _user_token: &str, _audience: &str) -> Result<String, TokenError> {
        Ok(LOCAL_TOKEN.to_string())
    }
}

/// Azure AD on-behalf-of exchange (jwt-bearer grant).
pub struct AzureOboExchanger {
    http: reqwest::Client,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl AzureOboExchanger {
    pub fn new(token_endpoint: String, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_endpoint,
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl TokenExchanger for AzureOboExchanger {
    async fn obo_token(&self, user_token: &str, audience: &str) -> Result<String, TokenError> {
        // Audiences are configured as "cluster:namespace:app"; Azure scopes
        // want dots.
        let scope = format!("api://{}/.default", audience.replace(':', "."));
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("assertion", user_token),
            ("scope", scope.as_str()),
            ("requested_token_use", "on_behalf_of"),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| TokenError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, audience, "OBO token exchange rejected");
            return Err(TokenError::Exchange(format!(
                "token endpoint responded {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::Exchange(e.to_string()))?;
        Ok(token.access_token)
    }
}
