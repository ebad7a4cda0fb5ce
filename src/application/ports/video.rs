use async_trait::async_trait;

use crate::domain::{ClassifyFailure, FailureClass};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LipsyncSource {
    /// Speech synthesized by the provider from this text.
    Text(String),
    /// Audio the caller staged, referenced by fetchable URL.
    AudioUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LipsyncSubmission {
    pub face_url: String,
    pub source: LipsyncSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedVideoJob {
    pub job_id: String,
    pub status_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoJobState {
    Running,
    Completed { video_url: String },
    Failed { reason: String },
}

#[async_trait]
pub trait VideoSynthesisBackend: Send + Sync {
    async fn submit(
        &self,
        submission: &LipsyncSubmission,
    ) -> Result<SubmittedVideoJob, VideoBackendError>;

    async fn poll(&self, job: &SubmittedVideoJob) -> Result<VideoJobState, VideoBackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VideoBackendError {
    #[error("submission rejected: {0}")]
    RejectedInput(String),
    #[error("video service unavailable: {0}")]
    Unavailable(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClassifyFailure for VideoBackendError {
    fn class(&self) -> FailureClass {
        match self {
            VideoBackendError::Unavailable(_) | VideoBackendError::InvalidResponse(_) => {
                FailureClass::TransientBackend
            }
            VideoBackendError::RejectedInput(_) => FailureClass::PermanentInput,
            VideoBackendError::AccessDenied(_) => FailureClass::PermanentAuth,
        }
    }
}
