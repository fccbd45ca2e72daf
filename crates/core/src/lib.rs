// crates/core/src/lib.rs
//! Subgen core library.
//!
//! Everything the HTTP layer delegates to lives here: the in-memory job
//! registry and its state machine, the storage directories for uploads and
//! finished subtitles, the transcription backend abstraction (with the
//! OpenAI Whisper implementation), and the pipeline that turns one accepted
//! upload into one terminal job state.

pub mod backend;
pub mod job;
pub mod pipeline;
pub mod registry;
pub mod storage;

pub use backend::{BackendError, OpenAiBackend, TranscriptionBackend};
pub use job::{Job, JobId, JobState};
pub use pipeline::JobPipeline;
pub use registry::{JobRegistry, RegistryError};
pub use storage::{StorageError, StoragePaths};
