//! Protocol-level error mapping.
//!
//! Every failure is logged with full context here, once, before being
//! mapped; the body crossing the trust boundary never carries more than
//! the extracted message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use skattekort_client::FetchError;
use skattekort_core::error::{
    ConfigError, NormalizeError, TokenError, UpstreamError, ValidationError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No usable session token on the request.
    #[error("Unauthorized")]
    Unauthenticated,

    #[error(transparent)]
    TokenExchange(#[from] TokenError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Config(e) => Self::Config(e),
            FetchError::Upstream(e) => Self::Upstream(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Upstream(UpstreamError::BadRequest(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated
            | Self::TokenExchange(_)
            | Self::Upstream(UpstreamError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Upstream(UpstreamError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Upstream(UpstreamError::Unavailable(_))
            | Self::Config(_)
            | Self::Normalize(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body crossing the trust boundary. Internal detail stays in the
    /// log.
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::Validation(e) => json!({
                "error": e.to_string(),
                "details": [e.to_string()],
            }),
            Self::Unauthenticated | Self::TokenExchange(_) => json!({ "error": "Unauthorized" }),
            Self::Upstream(e @ UpstreamError::BadRequest(_))
            | Self::Upstream(e @ UpstreamError::Unauthorized)
            | Self::Upstream(e @ UpstreamError::NotFound(_)) => {
                json!({ "error": e.to_string() })
            }
            Self::Config(_) => json!({ "error": "Configuration error" }),
            Self::Upstream(UpstreamError::Unavailable(_))
            | Self::Normalize(_)
            | Self::Internal(_) => json!({ "error": "Internal server error" }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, message = %self, "request failed");
        (self.status(), Json(self.body())).into_response()
    }
}
