// crates/core/src/registry.rs
//! Process-wide job registry: the single source of truth for job state.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::job::{Job, JobId, JobState};

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("job id already registered: {0}")]
    DuplicateId(JobId),

    #[error("unknown job id: {0}")]
    UnknownJob(JobId),

    #[error("job {id} is already {current}, cannot mark it {requested}")]
    InvalidTransition {
        id: JobId,
        current: &'static str,
        requested: &'static str,
    },
}

/// Thread-safe map from job id to job record.
///
/// Every read and write is a short critical section; the lock is never held
/// across an `.await` point, so registry access never blocks on an in-flight
/// transcription.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new job in the `processing` state.
    ///
    /// Ids are generated collision-resistant, so `DuplicateId` indicates a
    /// caller bug rather than an expected runtime condition, but it is
    /// guarded regardless.
    pub fn create(&self, id: JobId) -> Result<(), RegistryError> {
        let mut jobs = self.write();
        if jobs.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        jobs.insert(id.clone(), Job::new(id));
        Ok(())
    }

    /// Snapshot of the current record, or `None` for an id that was never
    /// issued (or has been evicted).
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.read().get(id).cloned()
    }

    /// Transition `processing -> done`, recording the artifact file name.
    pub fn mark_done(
        &self,
        id: &JobId,
        artifact: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.transition(
            id,
            JobState::Done {
                artifact: artifact.into(),
            },
        )
    }

    /// Transition `processing -> error`, recording the diagnostic message.
    pub fn mark_error(
        &self,
        id: &JobId,
        message: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.transition(
            id,
            JobState::Error {
                message: message.into(),
            },
        )
    }

    /// Evict a record. Hook for an external reaping policy; the pipeline
    /// itself never removes jobs.
    pub fn remove(&self, id: &JobId) -> Option<Job> {
        self.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Number of jobs still in `processing`.
    pub fn active_len(&self) -> usize {
        self.read()
            .values()
            .filter(|job| !job.state.is_terminal())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn transition(&self, id: &JobId, terminal: JobState) -> Result<(), RegistryError> {
        let mut jobs = self.write();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownJob(id.clone()))?;
        if job.state.is_terminal() {
            return Err(RegistryError::InvalidTransition {
                id: id.clone(),
                current: job.state.as_str(),
                requested: terminal.as_str(),
            });
        }
        job.state = terminal;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<JobId, Job>> {
        self.jobs.read().unwrap_or_else(|e| {
            tracing::error!("job map lock poisoned on read: {e}");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<JobId, Job>> {
        self.jobs.write().unwrap_or_else(|e| {
            tracing::error!("job map lock poisoned on write: {e}");
            e.into_inner()
        })
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let registry = JobRegistry::new();
        let id = JobId::generate();

        registry.create(id.clone()).unwrap();

        let job = registry.get(&id).expect("job exists");
        assert_eq!(job.id, id);
        assert_eq!(job.state, JobState::Processing);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_id_returns_none() {
        let registry = JobRegistry::new();
        assert!(registry.get(&JobId::from("never-issued")).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = JobRegistry::new();
        let id = JobId::from("dup");

        registry.create(id.clone()).unwrap();
        let err = registry.create(id).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mark_done_sets_artifact() {
        let registry = JobRegistry::new();
        let id = JobId::generate();
        registry.create(id.clone()).unwrap();

        registry.mark_done(&id, "abc.srt").unwrap();

        let job = registry.get(&id).unwrap();
        assert_eq!(
            job.state,
            JobState::Done {
                artifact: "abc.srt".into()
            }
        );
    }

    #[test]
    fn test_mark_error_sets_message() {
        let registry = JobRegistry::new();
        let id = JobId::generate();
        registry.create(id.clone()).unwrap();

        registry.mark_error(&id, "provider timed out").unwrap();

        let job = registry.get(&id).unwrap();
        assert_eq!(
            job.state,
            JobState::Error {
                message: "provider timed out".into()
            }
        );
    }

    #[test]
    fn test_terminal_state_transitions_only_once() {
        let registry = JobRegistry::new();
        let id = JobId::generate();
        registry.create(id.clone()).unwrap();
        registry.mark_done(&id, "a.srt").unwrap();

        // A settled job refuses both re-transitions.
        assert!(matches!(
            registry.mark_error(&id, "late failure").unwrap_err(),
            RegistryError::InvalidTransition { .. }
        ));
        assert!(matches!(
            registry.mark_done(&id, "b.srt").unwrap_err(),
            RegistryError::InvalidTransition { .. }
        ));

        // Repeated reads observe the same terminal state.
        let job = registry.get(&id).unwrap();
        assert_eq!(
            job.state,
            JobState::Done {
                artifact: "a.srt".into()
            }
        );
    }

    #[test]
    fn test_mark_unknown_job_fails() {
        let registry = JobRegistry::new();
        let err = registry
            .mark_done(&JobId::from("ghost"), "x.srt")
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownJob(_)));
    }

    #[test]
    fn test_remove_evicts_record() {
        let registry = JobRegistry::new();
        let id = JobId::generate();
        registry.create(id.clone()).unwrap();
        registry.mark_done(&id, "a.srt").unwrap();

        let evicted = registry.remove(&id).expect("record existed");
        assert!(evicted.state.is_terminal());
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_active_len_counts_only_processing_jobs() {
        let registry = JobRegistry::new();
        let a = JobId::generate();
        let b = JobId::generate();
        registry.create(a.clone()).unwrap();
        registry.create(b.clone()).unwrap();
        assert_eq!(registry.active_len(), 2);

        registry.mark_done(&a, "a.srt").unwrap();
        assert_eq!(registry.active_len(), 1);
        assert_eq!(registry.len(), 2);

        registry.mark_error(&b, "boom").unwrap();
        assert_eq!(registry.active_len(), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_independent_jobs_do_not_interfere() {
        let registry = JobRegistry::new();
        let a = JobId::generate();
        let b = JobId::generate();
        registry.create(a.clone()).unwrap();
        registry.create(b.clone()).unwrap();

        registry.mark_error(&a, "boom").unwrap();
        registry.mark_done(&b, "b.srt").unwrap();

        assert_eq!(registry.get(&a).unwrap().state.as_str(), "error");
        assert_eq!(registry.get(&b).unwrap().state.as_str(), "done");
    }
}
