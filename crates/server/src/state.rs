// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use subgen_core::{JobPipeline, JobRegistry, StoragePaths};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Job pipeline: accepts uploads and runs background transcription.
    pub pipeline: JobPipeline,
    /// Read-side handle to the job registry (status projections).
    pub registry: Arc<JobRegistry>,
    /// Working directories for uploads and finished subtitles.
    pub storage: StoragePaths,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    ///
    /// The registry and storage handles are the pipeline's own: routes and
    /// background tasks always observe the same job map and directories.
    pub fn new(pipeline: JobPipeline) -> Arc<Self> {
        let registry = Arc::clone(pipeline.registry());
        let storage = pipeline.storage().clone();
        Arc::new(Self {
            start_time: Instant::now(),
            pipeline,
            registry,
            storage,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
