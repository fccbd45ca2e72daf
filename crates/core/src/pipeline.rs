// crates/core/src/pipeline.rs
//! Job pipeline: turns one accepted upload into one terminal job state.
//!
//! `submit` registers the job synchronously and spawns a background task,
//! so upload-accept latency is decoupled from transcription latency. The
//! spawned task owns the job from then on and guarantees exactly one
//! terminal registry update, whatever the backend does.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::TranscriptionBackend;
use crate::job::JobId;
use crate::registry::{JobRegistry, RegistryError};
use crate::storage::StoragePaths;

#[derive(Clone)]
pub struct JobPipeline {
    registry: Arc<JobRegistry>,
    backend: Arc<dyn TranscriptionBackend>,
    storage: StoragePaths,
    backend_timeout: Duration,
}

impl JobPipeline {
    /// Bounded wait on the backend call. Large audio can legitimately take
    /// minutes; a stuck call must still never strand a job in `processing`.
    pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(
        registry: Arc<JobRegistry>,
        backend: Arc<dyn TranscriptionBackend>,
        storage: StoragePaths,
    ) -> Self {
        Self {
            registry,
            backend,
            storage,
            backend_timeout: Self::DEFAULT_BACKEND_TIMEOUT,
        }
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    pub fn storage(&self) -> &StoragePaths {
        &self.storage
    }

    /// Accept an upload that is already persisted at `source`.
    ///
    /// Registers the job as `processing` before returning, so a status
    /// query issued immediately afterwards observes at least `processing`.
    /// Transcription errors never surface here; they are absorbed into the
    /// job record and observable via later status queries.
    pub fn submit(&self, source: PathBuf) -> Result<JobId, RegistryError> {
        let id = JobId::generate();
        self.registry.create(id.clone())?;
        tracing::info!(job_id = %id, source = %source.display(), "transcription job accepted");

        let pipeline = self.clone();
        let job_id = id.clone();
        tokio::spawn(async move {
            pipeline.run_job(job_id, source).await;
        });

        Ok(id)
    }

    /// Background task body. Must end in exactly one terminal state and
    /// never propagate a failure past its own boundary.
    async fn run_job(&self, id: JobId, source: PathBuf) {
        match self.transcribe_to_artifact(&id, &source).await {
            Ok(artifact) => {
                if let Err(e) = self.registry.mark_done(&id, &artifact) {
                    tracing::error!(job_id = %id, error = %e, "could not record job completion");
                } else {
                    tracing::info!(job_id = %id, artifact = %artifact, "transcription job finished");
                }
            }
            Err(reason) => {
                if let Err(e) = self.registry.mark_error(&id, &reason) {
                    tracing::error!(job_id = %id, error = %e, "could not record job failure");
                }
                tracing::warn!(job_id = %id, reason = %reason, "transcription job failed");
            }
        }

        // The source upload is removed on both terminal paths.
        if let Err(e) = tokio::fs::remove_file(&source).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    job_id = %id,
                    path = %source.display(),
                    error = %e,
                    "could not remove source upload"
                );
            }
        }
    }

    async fn transcribe_to_artifact(
        &self,
        id: &JobId,
        source: &PathBuf,
    ) -> Result<String, String> {
        let transcript =
            match tokio::time::timeout(self.backend_timeout, self.backend.transcribe(source))
                .await
            {
                Ok(Ok(transcript)) => transcript,
                Ok(Err(e)) => return Err(e.to_string()),
                Err(_) => {
                    return Err(format!(
                        "transcription timed out after {}s",
                        self.backend_timeout.as_secs()
                    ))
                }
            };

        let artifact = StoragePaths::artifact_name(id);
        let path = self.storage.artifact_path(id);
        tokio::fs::write(&path, transcript.as_bytes())
            .await
            .map_err(|e| format!("writing artifact {}: {e}", path.display()))?;
        Ok(artifact)
    }
}
