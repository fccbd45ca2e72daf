//! API route handlers for the subgen server.

pub mod download;
pub mod health;
pub mod status;
pub mod upload;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router.
///
/// Routes:
/// - GET  /health - Health check
/// - POST /upload - Accept an audio file, return a job id
/// - GET  /status/{job_id} - Poll a job's state
/// - GET  /download/{file} - Stream a finished subtitle file
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(upload::router())
        .merge(status::router())
        .merge(download::router())
        .with_state(state)
}
