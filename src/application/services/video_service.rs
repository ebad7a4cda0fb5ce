use std::sync::Arc;
use std::time::Duration;

use crate::application::polling::PollingPolicy;
use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, LipsyncSource, LipsyncSubmission, SubmittedVideoJob,
    VideoBackendError, VideoJobState, VideoSynthesisBackend,
};
use crate::domain::{
    Artifact, ArtifactState, AsyncJob, ClassifyFailure, JobStatus, MAX_LIPSYNC_AUDIO_BYTES,
    MAX_UPLOAD_BYTES, MediaKind, MediaUpload, MediaValidationError, StoragePath,
    mime_for_extension, validate_upload,
};

/// The three payload shapes the lipsync provider accepts. Selected by the
/// caller; exactly one applies per request.
#[derive(Debug, Clone)]
pub enum LipsyncVariant {
    TextWithImage { text: String, face: MediaUpload },
    AudioWithImage { audio: MediaUpload, face: MediaUpload },
    AudioWithImageUrl { audio: MediaUpload, face_url: String },
}

#[derive(Debug, Clone)]
pub struct SynthesizedVideo {
    pub video_url: String,
    pub job: AsyncJob,
}

/// Stages uploads, submits one lipsync job, deletes the staged artifacts as
/// soon as submission returns (the job service keeps its own copy), then
/// polls until the job finishes or the wait budget runs out.
pub struct VideoSynthesisService {
    store: Arc<dyn ArtifactStore>,
    backend: Arc<dyn VideoSynthesisBackend>,
    polling: PollingPolicy,
}

impl VideoSynthesisService {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        backend: Arc<dyn VideoSynthesisBackend>,
        polling: PollingPolicy,
    ) -> Self {
        Self {
            store,
            backend,
            polling,
        }
    }

    #[tracing::instrument(skip(self, variant))]
    pub async fn synthesize(
        &self,
        variant: LipsyncVariant,
    ) -> Result<SynthesizedVideo, VideoSynthesisError> {
        let mut staged: Vec<Artifact> = Vec::new();

        let submission = match self.build_submission(variant, &mut staged).await {
            Ok(submission) => submission,
            Err(error) => {
                self.delete_staged(&mut staged).await;
                return Err(error);
            }
        };

        let submitted = self.submit_with_retry(&submission).await;

        // The provider holds its own copy once the submission has been
        // answered, accepted or not.
        self.delete_staged(&mut staged).await;

        let handle = submitted?;
        let mut job = AsyncJob::new(handle.job_id.clone());
        let video_url = self.poll_to_completion(&mut job, &handle).await?;

        tracing::info!(job = %handle.job_id, polls = job.poll_count, "lipsync video ready");
        Ok(SynthesizedVideo { video_url, job })
    }

    async fn build_submission(
        &self,
        variant: LipsyncVariant,
        staged: &mut Vec<Artifact>,
    ) -> Result<LipsyncSubmission, VideoSynthesisError> {
        match variant {
            LipsyncVariant::TextWithImage { text, face } => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(VideoSynthesisError::EmptyText);
                }
                let face_url = self
                    .stage(staged, &face, MediaKind::Image, MAX_UPLOAD_BYTES, "face")
                    .await?;
                Ok(LipsyncSubmission {
                    face_url,
                    source: LipsyncSource::Text(text),
                })
            }
            LipsyncVariant::AudioWithImage { audio, face } => {
                let audio_url = self
                    .stage(
                        staged,
                        &audio,
                        MediaKind::Audio,
                        MAX_LIPSYNC_AUDIO_BYTES,
                        "audio",
                    )
                    .await?;
                let face_url = self
                    .stage(staged, &face, MediaKind::Image, MAX_UPLOAD_BYTES, "face")
                    .await?;
                Ok(LipsyncSubmission {
                    face_url,
                    source: LipsyncSource::AudioUrl(audio_url),
                })
            }
            LipsyncVariant::AudioWithImageUrl { audio, face_url } => {
                let face_url = face_url.trim().to_string();
                if face_url.is_empty() {
                    return Err(VideoSynthesisError::EmptyFaceUrl);
                }
                let audio_url = self
                    .stage(
                        staged,
                        &audio,
                        MediaKind::Audio,
                        MAX_LIPSYNC_AUDIO_BYTES,
                        "audio",
                    )
                    .await?;
                Ok(LipsyncSubmission {
                    face_url,
                    source: LipsyncSource::AudioUrl(audio_url),
                })
            }
        }
    }

    /// Validates and stages one upload, returning its fetchable URL. The
    /// artifact is pushed onto `staged` even when the upload fails so the
    /// caller's cleanup can remove partial state.
    async fn stage(
        &self,
        staged: &mut Vec<Artifact>,
        upload: &MediaUpload,
        kind: MediaKind,
        max_bytes: u64,
        role: &'static str,
    ) -> Result<String, VideoSynthesisError> {
        let extension = validate_upload(upload, kind, max_bytes)
            .map_err(|source| VideoSynthesisError::InvalidMedia { role, source })?;

        let path = StoragePath::for_upload(role, &extension);
        let mut artifact = Artifact::pending(path.clone(), mime_for_extension(&extension));

        let stored = self
            .store
            .store(&path, upload.bytes.clone(), &artifact.content_type)
            .await;
        match stored {
            Ok(_) => artifact.mark_staged(),
            Err(error) => {
                staged.push(artifact);
                return Err(VideoSynthesisError::Staging(error));
            }
        }
        staged.push(artifact);
        Ok(self.store.public_url(&path))
    }

    async fn submit_with_retry(
        &self,
        submission: &LipsyncSubmission,
    ) -> Result<SubmittedVideoJob, VideoSynthesisError> {
        let first = self.backend.submit(submission).await;
        let result = match first {
            Err(error) if error.class().is_retryable() => {
                tracing::warn!(error = %error, "lipsync submission failed transiently, retrying once");
                self.backend.submit(submission).await
            }
            other => other,
        };

        result.map_err(|error| match error {
            VideoBackendError::RejectedInput(message) => VideoSynthesisError::Rejected(message),
            other => VideoSynthesisError::Failed(other.to_string()),
        })
    }

    async fn poll_to_completion(
        &self,
        job: &mut AsyncJob,
        handle: &SubmittedVideoJob,
    ) -> Result<String, VideoSynthesisError> {
        let polled = tokio::time::timeout(self.polling.wait_budget, async {
            let mut interval = self.polling.initial_interval;
            loop {
                job.record_poll();
                match self.backend.poll(handle).await {
                    Ok(VideoJobState::Completed { video_url }) => return Ok(video_url),
                    Ok(VideoJobState::Failed { reason }) => {
                        return Err(VideoSynthesisError::Failed(reason));
                    }
                    Ok(VideoJobState::Running) => {}
                    Err(error) => return Err(VideoSynthesisError::Failed(error.to_string())),
                }
                tokio::time::sleep(interval).await;
                interval = self.polling.next_interval(interval);
            }
        })
        .await;

        match polled {
            Ok(Ok(video_url)) => {
                job.finish(JobStatus::Succeeded);
                Ok(video_url)
            }
            Ok(Err(error)) => {
                job.finish(JobStatus::Failed);
                Err(error)
            }
            Err(_elapsed) => {
                job.finish(JobStatus::TimedOut);
                Err(VideoSynthesisError::TimedOut(self.polling.wait_budget))
            }
        }
    }

    async fn delete_staged(&self, staged: &mut Vec<Artifact>) {
        for artifact in staged.iter_mut() {
            if artifact.state == ArtifactState::Deleted {
                continue;
            }
            match self.store.delete(&artifact.path).await {
                Ok(()) => artifact.mark_deleted(),
                Err(ArtifactStoreError::NotFound(_)) => artifact.mark_deleted(),
                Err(error) => {
                    tracing::warn!(
                        path = %artifact.path,
                        error = %error,
                        "failed to delete staged media"
                    );
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VideoSynthesisError {
    #[error("invalid {role} upload: {source}")]
    InvalidMedia {
        role: &'static str,
        source: MediaValidationError,
    },
    #[error("text prompt must not be empty")]
    EmptyText,
    #[error("face image url must not be empty")]
    EmptyFaceUrl,
    #[error("staging failed: {0}")]
    Staging(#[from] ArtifactStoreError),
    #[error("video synthesis rejected the input: {0}")]
    Rejected(String),
    #[error("video synthesis failed: {0}")]
    Failed(String),
    #[error("video synthesis did not finish within {0:?}")]
    TimedOut(Duration),
}
