use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionJobState {
    /// Queued or still running.
    Pending,
    Completed { transcript_uri: String },
    Failed { reason: String },
}

/// Asynchronous batch transcription over audio already staged in object
/// storage. Jobs are observed by polling `job_state`.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn start_job(
        &self,
        job_name: &str,
        media_uri: &str,
        media_format: &str,
        language_code: &str,
    ) -> Result<(), TranscriptionBackendError>;

    async fn job_state(&self, job_name: &str)
    -> Result<TranscriptionJobState, TranscriptionBackendError>;

    /// Downloads and parses the transcript document a completed job points at.
    async fn fetch_transcript(
        &self,
        transcript_uri: &str,
    ) -> Result<String, TranscriptionBackendError>;

    async fn delete_job(&self, job_name: &str) -> Result<(), TranscriptionBackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionBackendError {
    #[error("job submission failed: {0}")]
    SubmitFailed(String),
    #[error("status poll failed: {0}")]
    PollFailed(String),
    #[error("transcript fetch failed: {0}")]
    FetchFailed(String),
    #[error("job deletion failed: {0}")]
    DeleteFailed(String),
}
