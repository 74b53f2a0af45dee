//! Liveness/readiness probes. No auth, no state.

pub async fn is_alive() -> &'static str {
    "OK"
}

pub async fn is_ready() -> &'static str {
    "OK"
}
