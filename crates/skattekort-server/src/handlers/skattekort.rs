//! POST /api/skattekort/hent-skattekort — the lookup relay.

use axum::{Extension, Json};
use skattekort_core::model::NormalizedSkattekort;
use skattekort_core::normalize::normalize;
use skattekort_core::query::{validate, HentSkattekortRequest};

use crate::error::AppError;
use crate::middleware::auth::SessionToken;
use crate::state::AppState;

pub async fn hent_skattekort(
    Extension(state): Extension<AppState>,
    Extension(session): Extension<SessionToken>,
    Json(raw): Json<HentSkattekortRequest>,
) -> Result<Json<Vec<NormalizedSkattekort>>, AppError> {
    let query = validate(&raw)?;

    // The audience only matters when a real exchange happens; a local
    // deployment configures base URLs without audiences.
    let backend_token = if state.local_mode {
        session.0.clone()
    } else {
        let audience = state.upstream.audience_for(query.variant)?;
        state.tokens.obo_token(&session.0, audience).await?
    };

    let payload = state.api.hent_skattekort(&query, &backend_token).await?;
    let entries = normalize(payload)?;

    Ok(Json(entries))
}
