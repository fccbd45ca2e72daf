// crates/server/src/routes/upload.rs
//! Upload endpoint: accepts an audio file and schedules transcription.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use subgen_core::JobId;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Upload size ceiling: 500 MiB, enforced before the pipeline sees anything.
pub const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Response for an accepted upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct UploadResponse {
    pub job_id: JobId,
}

/// POST /upload - Accept a multipart audio upload.
///
/// Persists the `audio` field to the uploads directory, registers a job,
/// and returns its id immediately; transcription runs in the background
/// and its outcome is only observable via `/status/{job_id}`.
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some("audio") {
            continue;
        }

        let source = state
            .storage
            .uploads_dir()
            .join(format!("{}.upload", Uuid::new_v4().simple()));

        let mut file = tokio::fs::File::create(&source)
            .await
            .map_err(|e| ApiError::Internal(format!("creating upload file: {e}")))?;
        // Stream field chunks straight to disk; the body limit has already
        // bounded the total size.
        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    remove_best_effort(&source).await;
                    return Err(e.into());
                }
            };
            if let Err(e) = file.write_all(&chunk).await {
                remove_best_effort(&source).await;
                return Err(ApiError::Internal(format!("writing upload: {e}")));
            }
        }
        if let Err(e) = file.flush().await {
            remove_best_effort(&source).await;
            return Err(ApiError::Internal(format!("flushing upload: {e}")));
        }
        drop(file);

        let job_id = match state.pipeline.submit(source.clone()) {
            Ok(id) => id,
            Err(e) => {
                remove_best_effort(&source).await;
                return Err(ApiError::Internal(e.to_string()));
            }
        };
        return Ok(Json(UploadResponse { job_id }));
    }

    Err(ApiError::BadRequest(
        "missing multipart field 'audio'".to_string(),
    ))
}

async fn remove_best_effort(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "could not remove rejected upload");
        }
    }
}

/// Create the upload routes router.
pub fn router() -> Router<Arc<AppState>> {
    router_with_limit(MAX_UPLOAD_BYTES)
}

/// Upload router with a caller-chosen body limit. Tests shrink the limit so
/// the over-size rejection is exercisable without a multi-hundred-megabyte
/// request body.
pub(crate) fn router_with_limit(limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload_audio))
        .layer(DefaultBodyLimit::max(limit))
}
