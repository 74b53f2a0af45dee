//! Router construction.

use axum::routing::{get, post};
use axum::{middleware as axum_mw, Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::auth::{session_auth, AuthConfig};
use crate::state::AppState;

/// Build the full axum router. The `/internal/*` probes are public; the
/// lookup endpoint sits behind the session middleware.
pub fn build_router(state: AppState, auth: AuthConfig) -> Router {
    let protected = Router::new()
        .route(
            "/api/skattekort/hent-skattekort",
            post(handlers::skattekort::hent_skattekort),
        )
        .layer(axum_mw::from_fn(session_auth))
        .layer(Extension(auth));

    let public = Router::new()
        .route("/internal/isAlive", get(handlers::health::is_alive))
        .route("/internal/isReady", get(handlers::health::is_ready));

    public
        .merge(protected)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
