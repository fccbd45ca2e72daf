// crates/server/src/routes/health.rs
//! Health endpoint: liveness plus a snapshot of the job registry.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness report. The job counters give an operator a cheap view of how
/// much transcription work the process is holding in memory.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    /// Jobs still transcribing.
    pub active_jobs: usize,
    /// Jobs tracked in memory, terminal ones included.
    pub total_jobs: usize,
}

/// GET /health - Liveness and registry counters.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        active_jobs: state.registry.active_len(),
        total_jobs: state.registry.len(),
    })
}

/// Create the health routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
