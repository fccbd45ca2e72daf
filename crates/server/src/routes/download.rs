// crates/server/src/routes/download.rs
//! Download endpoint: streams a finished subtitle file.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio_util::io::ReaderStream;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /download/{file} - Stream an artifact from the outputs directory.
///
/// The file name is resolved strictly inside the outputs directory;
/// traversal attempts are rejected before the filesystem is touched. A job
/// that has not finished has no artifact yet, so the same 404 covers
/// "not done" and "externally deleted".
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> ApiResult<Response> {
    let path = state.storage.resolve_artifact(&file)?;

    let handle = match tokio::fs::File::open(&path).await {
        Ok(handle) => handle,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::ArtifactNotFound(file));
        }
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "opening artifact {}: {e}",
                path.display()
            )));
        }
    };

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file}\""))
        .map_err(|e| ApiError::Internal(format!("building content-disposition: {e}")))?;
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-subrip; charset=utf-8"),
        ),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    let body = Body::from_stream(ReaderStream::new(handle));
    Ok((headers, body).into_response())
}

/// Create the download routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/download/{file}", get(download_artifact))
}
