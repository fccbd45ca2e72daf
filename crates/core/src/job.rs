// crates/core/src/job.rs
//! Job record and state machine.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a transcription job.
///
/// Assigned once at submission, stable for the job's lifetime, and used as
/// the external handle and as the artifact file stem (`<id>.srt`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh collision-resistant id (UUID v4, simple form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where a job currently stands.
///
/// `Processing` is the only initial state. A job transitions at most once,
/// to exactly one of the terminal variants, and never transitions again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// The background task has been scheduled but has not finished.
    Processing,
    /// Transcription succeeded; `artifact` is the file name in the outputs
    /// directory (not a path; the filesystem owns the bytes).
    Done { artifact: String },
    /// Transcription failed; `message` is an opaque diagnostic string.
    Error { message: String },
}

impl JobState {
    /// Wire name for the state, as reported by the status endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Processing => "processing",
            JobState::Done { .. } => "done",
            JobState::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Processing)
    }
}

/// One tracked transcription request.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub state: JobState,
}

impl Job {
    /// A freshly accepted job always starts in `Processing`.
    pub(crate) fn new(id: JobId) -> Self {
        Self {
            id,
            state: JobState::Processing,
        }
    }
}
