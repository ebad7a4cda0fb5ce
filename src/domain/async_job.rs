use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Submitted,
    Running,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::TimedOut => "TIMED_OUT",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::TimedOut
        )
    }
}

impl FromStr for JobStatus {
    type Err = String;

    // Accepts both the internal names and the wire strings AWS Transcribe
    // reports for batch jobs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMITTED" | "QUEUED" => Ok(JobStatus::Submitted),
            "RUNNING" | "IN_PROGRESS" => Ok(JobStatus::Running),
            "SUCCEEDED" | "COMPLETED" => Ok(JobStatus::Succeeded),
            "FAILED" => Ok(JobStatus::Failed),
            "TIMED_OUT" => Ok(JobStatus::TimedOut),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A backend-tracked unit of work observed via polling. Mutated only by the
/// polling loop that owns it.
#[derive(Debug, Clone)]
pub struct AsyncJob {
    pub id: JobId,
    pub remote_name: String,
    pub status: JobStatus,
    pub poll_count: u32,
    pub submitted_at: DateTime<Utc>,
}

impl AsyncJob {
    pub fn new(remote_name: String) -> Self {
        Self {
            id: JobId::new(),
            remote_name,
            status: JobStatus::Submitted,
            poll_count: 0,
            submitted_at: Utc::now(),
        }
    }

    pub fn record_poll(&mut self) {
        self.poll_count += 1;
        if self.status == JobStatus::Submitted {
            self.status = JobStatus::Running;
        }
    }

    pub fn finish(&mut self, status: JobStatus) {
        self.status = status;
    }
}
