//! reqwest implementation of [`SkattekortApi`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use skattekort_core::error::UpstreamError;
use skattekort_core::query::SkattekortQuery;

use crate::{FetchError, SkattekortApi, UpstreamConfig};

/// Longest raw (non-JSON) error body we are willing to surface.
const MAX_RAW_ERROR_LEN: usize = 200;

pub struct HttpSkattekortClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpSkattekortClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SkattekortApi for HttpSkattekortClient {
    async fn hent_skattekort(
        &self,
        query: &SkattekortQuery,
        token: &str,
    ) -> Result<Value, FetchError> {
        let endpoint = self.config.endpoint_for(query.variant)?;
        let url = format!("{}/api/v1/hent-skattekort", endpoint.base_url);

        tracing::info!(%url, variant = %query.variant, "fetching skattekort");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("Pragma", "no-cache")
            .header("Cache-Control", "no-cache")
            .json(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %url, "upstream request failed");
                UpstreamError::Unavailable(Some(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, %url, body = %body, "upstream response not OK");
            return Err(map_error_status(status, &body).into());
        }

        let payload = response.json::<Value>().await.map_err(|e| {
            tracing::error!(error = %e, %url, "upstream returned an unparseable body");
            UpstreamError::Unavailable(Some(e.to_string()))
        })?;

        Ok(payload)
    }
}

/// Exact status mapping of the upstream contract.
fn map_error_status(status: StatusCode, body: &str) -> UpstreamError {
    let message = extract_error_message(body);
    match status {
        StatusCode::BAD_REQUEST => UpstreamError::BadRequest(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Unauthorized,
        StatusCode::NOT_FOUND => UpstreamError::NotFound(message),
        _ => UpstreamError::Unavailable(
            message.or_else(|| Some(format!("upstream responded {status}"))),
        ),
    }
}

/// Read `message` or `error` from a JSON error body; fall back to the raw
/// text only when it is short enough to be a sensible message.
fn extract_error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Err(_) if !body.is_empty() && body.chars().count() < MAX_RAW_ERROR_LEN => {
            Some(body.to_string())
        }
        Err(_) => None,
    }
}
