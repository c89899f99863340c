//! In-memory report job registry
//!
//! Tracks report jobs from trigger to a terminal state. A job is created
//! `Running` and written exactly once more, to `Complete` (with the artifact
//! location) or `Failed` (with a reason kept for operators). Records live for
//! the lifetime of the process.

use crate::app::models::ReportArtifact;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Opaque report job identifier (a UUID v4 string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
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
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle state of a job; the artifact location only exists once complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Complete { output_location: PathBuf },
    Failed { reason: String },
}

/// Public status label of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Running,
    Complete,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "Running",
            JobStatus::Complete => "Complete",
            JobStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub job_id: JobId,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            state: JobState::Running,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn status(&self) -> JobStatus {
        match self.state {
            JobState::Running => JobStatus::Running,
            JobState::Complete { .. } => JobStatus::Complete,
            JobState::Failed { .. } => JobStatus::Failed,
        }
    }

    pub fn output_location(&self) -> Option<&Path> {
        match &self.state {
            JobState::Complete { output_location } => Some(output_location),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            JobState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// What a poller is allowed to see about a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPoll {
    Running,
    Complete(PathBuf),
    Failed,
    NotFound,
}

impl ReportPoll {
    /// Status label, or `None` for unknown jobs
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            ReportPoll::Running => Some(JobStatus::Running),
            ReportPoll::Complete(_) => Some(JobStatus::Complete),
            ReportPoll::Failed => Some(JobStatus::Failed),
            ReportPoll::NotFound => None,
        }
    }
}

impl From<&JobRecord> for ReportPoll {
    fn from(record: &JobRecord) -> Self {
        match &record.state {
            JobState::Running => ReportPoll::Running,
            JobState::Complete { output_location } => ReportPoll::Complete(output_location.clone()),
            JobState::Failed { .. } => ReportPoll::Failed,
        }
    }
}

/// Shared map of report jobs
///
/// Cloning is cheap; all clones see the same jobs.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new `Running` job and return its identifier
    pub fn create(&self) -> JobId {
        let mut jobs = self.jobs.write();
        let mut job_id = JobId::generate();
        while jobs.contains_key(&job_id) {
            job_id = JobId::generate();
        }
        jobs.insert(job_id.clone(), JobRecord::new(job_id.clone()));
        debug!("Registered report job {}", job_id);
        job_id
    }

    /// Poll a job without exposing failure details
    pub fn poll(&self, job_id: &JobId) -> ReportPoll {
        self.jobs
            .read()
            .get(job_id)
            .map(ReportPoll::from)
            .unwrap_or(ReportPoll::NotFound)
    }

    /// Full record snapshot, including any failure reason
    pub fn get(&self, job_id: &JobId) -> Option<JobRecord> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Mark a running job complete with its artifact location
    pub fn complete(&self, job_id: &JobId, output_location: impl Into<PathBuf>) -> Result<()> {
        self.transition(
            job_id,
            JobState::Complete {
                output_location: output_location.into(),
            },
        )
    }

    /// Mark a running job failed, keeping the reason internally
    pub fn fail(&self, job_id: &JobId, reason: impl Into<String>) -> Result<()> {
        self.transition(
            job_id,
            JobState::Failed {
                reason: reason.into(),
            },
        )
    }

    /// Record the outcome of a job's pipeline as its terminal state
    pub fn finish(&self, job_id: &JobId, outcome: Result<ReportArtifact>) -> Result<JobStatus> {
        match outcome {
            Ok(artifact) => {
                self.complete(job_id, artifact.path)?;
                Ok(JobStatus::Complete)
            }
            Err(e) => {
                self.fail(job_id, e.to_string())?;
                Ok(JobStatus::Failed)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    fn transition(&self, job_id: &JobId, next: JobState) -> Result<()> {
        let mut jobs = self.jobs.write();
        let record = jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::job_not_found(job_id.as_str()))?;

        if record.status().is_terminal() {
            warn!(
                "Refusing to move job {} out of terminal state {}",
                job_id,
                record.status()
            );
            return Err(Error::invalid_job_transition(
                job_id.as_str(),
                record.status().as_str(),
            ));
        }

        record.state = next;
        record.finished_at = Some(Utc::now());
        Ok(())
    }
}
