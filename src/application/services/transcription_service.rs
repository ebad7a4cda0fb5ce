use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::application::polling::PollingPolicy;
use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, TranscriptionBackend, TranscriptionJobState,
};
use crate::domain::{
    Artifact, ArtifactState, AsyncJob, JobStatus, MAX_UPLOAD_BYTES, MediaKind, MediaUpload,
    MediaValidationError, StoragePath, mime_for_extension, validate_upload,
};

// Container formats the batch transcription service accepts directly;
// anything else on the audio allow-list is submitted as mp3.
const NATIVE_MEDIA_FORMATS: &[&str] = &["mp3", "mp4", "wav", "flac"];

#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    pub job: AsyncJob,
}

/// Drives one audio upload through stage -> submit -> poll -> fetch, and
/// deletes the staged object on every exit path.
pub struct TranscriptionService {
    store: Arc<dyn ArtifactStore>,
    backend: Arc<dyn TranscriptionBackend>,
    polling: PollingPolicy,
    default_language: String,
}

impl TranscriptionService {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        backend: Arc<dyn TranscriptionBackend>,
        polling: PollingPolicy,
        default_language: String,
    ) -> Self {
        Self {
            store,
            backend,
            polling,
            default_language,
        }
    }

    #[tracing::instrument(skip(self, audio), fields(filename = %audio.filename, bytes = audio.size()))]
    pub async fn transcribe(
        &self,
        audio: MediaUpload,
        language: Option<&str>,
    ) -> Result<Transcript, TranscriptionError> {
        let extension = validate_upload(&audio, MediaKind::Audio, MAX_UPLOAD_BYTES)?;
        let media_format = if NATIVE_MEDIA_FORMATS.contains(&extension.as_str()) {
            extension.clone()
        } else {
            "mp3".to_string()
        };
        let language_code = language.unwrap_or(&self.default_language).to_string();

        let path = StoragePath::for_upload("transcribe", &extension);
        let mut artifact = Artifact::pending(path.clone(), mime_for_extension(&extension));

        if let Err(error) = self
            .store
            .store(&path, audio.bytes.clone(), &artifact.content_type)
            .await
        {
            // A failed upload can still leave a partial object behind.
            self.delete_artifact(&mut artifact).await;
            return Err(TranscriptionError::Staging(error));
        }
        artifact.mark_staged();

        let mut job = AsyncJob::new(format!("transcribe-{}", Uuid::new_v4()));
        let outcome = self
            .run_job(&mut job, &mut artifact, &media_format, &language_code)
            .await;

        self.delete_artifact(&mut artifact).await;

        let text = outcome?;
        tracing::info!(chars = text.len(), polls = job.poll_count, "transcription completed");
        Ok(Transcript { text, job })
    }

    async fn run_job(
        &self,
        job: &mut AsyncJob,
        artifact: &mut Artifact,
        media_format: &str,
        language_code: &str,
    ) -> Result<String, TranscriptionError> {
        let media_uri = self.store.uri(&artifact.path);
        if let Err(error) = self
            .backend
            .start_job(&job.remote_name, &media_uri, media_format, language_code)
            .await
        {
            job.finish(JobStatus::Failed);
            return Err(TranscriptionError::Failed(format!(
                "job submission: {error}"
            )));
        }
        artifact.mark_consumed();

        let result = self.poll_to_completion(job).await;

        if let Err(error) = self.backend.delete_job(&job.remote_name).await {
            tracing::debug!(
                job = %job.remote_name,
                error = %error,
                "failed to delete remote transcription job"
            );
        }

        let transcript_uri = result?;
        let text = match self.backend.fetch_transcript(&transcript_uri).await {
            Ok(text) => text,
            Err(error) => {
                job.finish(JobStatus::Failed);
                return Err(TranscriptionError::Failed(error.to_string()));
            }
        };
        job.finish(JobStatus::Succeeded);
        Ok(text)
    }

    async fn poll_to_completion(&self, job: &mut AsyncJob) -> Result<String, TranscriptionError> {
        let polled = tokio::time::timeout(self.polling.wait_budget, async {
            let mut interval = self.polling.initial_interval;
            loop {
                job.record_poll();
                match self.backend.job_state(&job.remote_name).await {
                    Ok(TranscriptionJobState::Completed { transcript_uri }) => {
                        return Ok(transcript_uri);
                    }
                    Ok(TranscriptionJobState::Failed { reason }) => {
                        return Err(TranscriptionError::Failed(reason));
                    }
                    Ok(TranscriptionJobState::Pending) => {}
                    Err(error) => return Err(TranscriptionError::Failed(error.to_string())),
                }
                tokio::time::sleep(interval).await;
                interval = self.polling.next_interval(interval);
            }
        })
        .await;

        match polled {
            Ok(Ok(transcript_uri)) => Ok(transcript_uri),
            Ok(Err(error)) => {
                job.finish(JobStatus::Failed);
                Err(error)
            }
            Err(_elapsed) => {
                job.finish(JobStatus::TimedOut);
                Err(TranscriptionError::TimedOut(self.polling.wait_budget))
            }
        }
    }

    async fn delete_artifact(&self, artifact: &mut Artifact) {
        if artifact.state == ArtifactState::Deleted {
            return;
        }
        match self.store.delete(&artifact.path).await {
            Ok(()) => artifact.mark_deleted(),
            Err(ArtifactStoreError::NotFound(_)) => artifact.mark_deleted(),
            Err(error) => {
                tracing::warn!(
                    path = %artifact.path,
                    error = %error,
                    "failed to delete staged audio"
                );
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("invalid audio upload: {0}")]
    InvalidAudio(#[from] MediaValidationError),
    #[error("staging failed: {0}")]
    Staging(#[from] ArtifactStoreError),
    #[error("transcription failed: {0}")]
    Failed(String),
    #[error("transcription did not finish within {0:?}")]
    TimedOut(Duration),
}
