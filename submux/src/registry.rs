//! Registry of live mux jobs.
//!
//! Shared between concurrently running jobs and the cancellation path, so
//! all access goes through an internal lock. The registry is injected into
//! job runners rather than living as process-wide ambient state.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::jobs::MuxMode;
use crate::{Error, Result};

/// Length of the short hex job id.
const JOB_ID_LEN: usize = 8;

/// Handle to one live job.
///
/// Carries cancellation authority: triggering the token makes the job's
/// exit-waiter kill the underlying process, which the runner then observes
/// as an abnormal exit.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: String,
    pub mode: MuxMode,
    pub started_at: DateTime<Utc>,
    cancel: CancellationToken,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, mode: MuxMode, cancel: CancellationToken) -> Self {
        Self {
            id: id.into(),
            mode,
            started_at: Utc::now(),
            cancel,
        }
    }

    /// Request termination of the job's process. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Process-wide mapping from job id to live job handle.
///
/// At most one entry exists per live id; entries are removed as soon as the
/// job's background tasks have both finished, regardless of outcome.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobHandle>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new live job. Fails if the id is already live.
    pub fn register(&self, handle: JobHandle) -> Result<()> {
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&handle.id) {
            return Err(Error::DuplicateJob(handle.id));
        }
        debug!(job_id = %handle.id, mode = %handle.mode, "job registered");
        jobs.insert(handle.id.clone(), handle);
        Ok(())
    }

    /// Register a fresh job under a newly generated id.
    ///
    /// Id generation retries on collision, so among concurrently live jobs
    /// the returned id is unique.
    pub fn register_new(&self, mode: MuxMode, cancel: CancellationToken) -> JobHandle {
        let mut jobs = self.jobs.write();
        let id = loop {
            let candidate = short_id();
            if !jobs.contains_key(&candidate) {
                break candidate;
            }
        };
        let handle = JobHandle::new(id, mode, cancel);
        debug!(job_id = %handle.id, mode = %handle.mode, "job registered");
        jobs.insert(handle.id.clone(), handle.clone());
        handle
    }

    /// Look up a live job by id.
    pub fn lookup(&self, id: &str) -> Result<JobHandle> {
        self.jobs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::JobNotFound(id.to_string()))
    }

    /// Remove a job. No-op if the id is already absent.
    pub fn unregister(&self, id: &str) {
        if self.jobs.write().remove(id).is_some() {
            debug!(job_id = %id, "job unregistered");
        }
    }

    /// Cancel a live job by id.
    pub fn cancel(&self, id: &str) -> Result<()> {
        self.lookup(id)?.cancel();
        Ok(())
    }

    /// Number of live jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// Ids of all live jobs.
    pub fn ids(&self) -> Vec<String> {
        self.jobs.read().keys().cloned().collect()
    }
}

/// Random short hex id, expected-unique among concurrently live jobs.
fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(JOB_ID_LEN);
    id
}
