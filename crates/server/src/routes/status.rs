// crates/server/src/routes/status.rs
//! Status endpoint: read-only projection of the job registry.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use subgen_core::{Job, JobId, JobState};

use crate::state::AppState;

/// Response for a status poll.
///
/// An id that was never issued (or has been reaped) reports `"unknown"`,
/// a distinct result, not an error, so callers can tell "never existed"
/// apart from "still processing" and from "finished".
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(rename = "errorInfo", skip_serializing_if = "Option::is_none")]
    pub error_info: Option<String>,
}

impl StatusResponse {
    pub fn unknown() -> Self {
        Self {
            state: "unknown",
            file: None,
            error_info: None,
        }
    }

    pub fn from_job(job: &Job) -> Self {
        match &job.state {
            JobState::Processing => Self {
                state: "processing",
                file: None,
                error_info: None,
            },
            JobState::Done { artifact } => Self {
                state: "done",
                file: Some(artifact.clone()),
                error_info: None,
            },
            JobState::Error { message } => Self {
                state: "error",
                file: None,
                error_info: Some(message.clone()),
            },
        }
    }
}

/// GET /status/{job_id} - Current state of a job.
pub async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Json<StatusResponse> {
    let id = JobId::from(job_id);
    match state.registry.get(&id) {
        Some(job) => Json(StatusResponse::from_job(&job)),
        None => Json(StatusResponse::unknown()),
    }
}

/// Create the status routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status/{job_id}", get(job_status))
}
