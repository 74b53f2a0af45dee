//! Bearer-token session middleware.
//!
//! Deployed mode validates the inbound JWT and stores the raw token for
//! the OBO exchange. Local mode skips validation and injects a placeholder
//! session so the lookup flow still works end to end.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use skattekort_client::token::LOCAL_TOKEN;

use crate::error::AppError;

#[derive(Clone)]
pub struct AuthConfig {
    decoding_key: DecodingKey,
    validation: Validation,
    local_mode: bool,
}

impl AuthConfig {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            local_mode: false,
        }
    }

    /// Require the token to be issued for us (Azure sets `aud` to the app
    /// client id).
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.validate_aud = true;
        self.validation.set_audience(&[audience]);
        self
    }

    pub fn local() -> Self {
        let mut config = Self::from_secret(&[]);
        config.local_mode = true;
        config
    }
}

/// The raw bearer token of the authenticated caller, as handed to the OBO
/// exchange.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

#[derive(Debug, Deserialize)]
struct Claims {
    #[allow(dead_code)]
    exp: usize,
}

pub async fn session_auth(
    Extension(config): Extension<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if config.local_mode {
        request
            .extensions_mut()
            .insert(SessionToken(LOCAL_TOKEN.to_string()));
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or(AppError::Unauthenticated)?;

    if let Err(e) = decode::<Claims>(&token, &config.decoding_key, &config.validation) {
        tracing::error!(error = %e, "invalid bearer token");
        return Err(AppError::Unauthenticated);
    }

    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}
