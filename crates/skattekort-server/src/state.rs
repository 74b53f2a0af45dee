//! Shared application state.

use std::sync::Arc;

use skattekort_client::{SkattekortApi, TokenExchanger, UpstreamConfig};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn SkattekortApi>,
    pub tokens: Arc<dyn TokenExchanger>,
    pub upstream: UpstreamConfig,
    /// Local deployments have no identity provider: the session placeholder
    /// is forwarded to the upstream as-is, without an OBO exchange.
    pub local_mode: bool,
}
