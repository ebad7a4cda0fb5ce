use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transcribe::Client;
use aws_sdk_transcribe::config::Region;
use aws_sdk_transcribe::error::ProvideErrorMetadata;
use aws_sdk_transcribe::types::{LanguageCode, Media, MediaFormat, TranscriptionJobStatus};
use serde::Deserialize;

use crate::application::ports::{
    TranscriptionBackend, TranscriptionBackendError, TranscriptionJobState,
};

/// AWS Transcribe batch jobs. The job reads audio from object storage by
/// URI; the finished transcript is a JSON document fetched over plain HTTP
/// from the URI the job reports.
pub struct AwsTranscribeBackend {
    client: Client,
    http: reqwest::Client,
}

impl AwsTranscribeBackend {
    pub fn new(sdk_config: &SdkConfig, region: &str) -> Self {
        let conf = aws_sdk_transcribe::config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client: Client::from_conf(conf),
            http,
        }
    }
}

#[derive(Deserialize)]
struct TranscriptDocument {
    results: TranscriptResults,
}

#[derive(Deserialize)]
struct TranscriptResults {
    transcripts: Vec<TranscriptItem>,
}

#[derive(Deserialize)]
struct TranscriptItem {
    transcript: String,
}

fn sdk_message<E: ProvideErrorMetadata + std::fmt::Display>(error: &E) -> String {
    match error.message() {
        Some(message) => message.to_string(),
        None => error.to_string(),
    }
}

#[async_trait]
impl TranscriptionBackend for AwsTranscribeBackend {
    #[tracing::instrument(skip(self), fields(job = %job_name))]
    async fn start_job(
        &self,
        job_name: &str,
        media_uri: &str,
        media_format: &str,
        language_code: &str,
    ) -> Result<(), TranscriptionBackendError> {
        let media = Media::builder().media_file_uri(media_uri).build();
        self.client
            .start_transcription_job()
            .transcription_job_name(job_name)
            .media(media)
            .media_format(MediaFormat::from(media_format))
            .language_code(LanguageCode::from(language_code))
            .send()
            .await
            .map_err(|e| TranscriptionBackendError::SubmitFailed(sdk_message(&e)))?;
        tracing::info!("transcription job started");
        Ok(())
    }

    async fn job_state(
        &self,
        job_name: &str,
    ) -> Result<TranscriptionJobState, TranscriptionBackendError> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| TranscriptionBackendError::PollFailed(sdk_message(&e)))?;

        let job = output.transcription_job().ok_or_else(|| {
            TranscriptionBackendError::PollFailed("response missing transcription job".into())
        })?;

        match job.transcription_job_status() {
            Some(TranscriptionJobStatus::Completed) => {
                let transcript_uri = job
                    .transcript()
                    .and_then(|t| t.transcript_file_uri())
                    .ok_or_else(|| {
                        TranscriptionBackendError::PollFailed(
                            "completed job missing transcript uri".into(),
                        )
                    })?;
                Ok(TranscriptionJobState::Completed {
                    transcript_uri: transcript_uri.to_string(),
                })
            }
            Some(TranscriptionJobStatus::Failed) => Ok(TranscriptionJobState::Failed {
                reason: job.failure_reason().unwrap_or("unknown").to_string(),
            }),
            _ => Ok(TranscriptionJobState::Pending),
        }
    }

    async fn fetch_transcript(
        &self,
        transcript_uri: &str,
    ) -> Result<String, TranscriptionBackendError> {
        let response = self
            .http
            .get(transcript_uri)
            .send()
            .await
            .map_err(|e| TranscriptionBackendError::FetchFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            return Err(TranscriptionBackendError::FetchFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let document: TranscriptDocument = response
            .json()
            .await
            .map_err(|e| TranscriptionBackendError::FetchFailed(format!("parse document: {e}")))?;

        document
            .results
            .transcripts
            .into_iter()
            .next()
            .map(|t| t.transcript)
            .ok_or_else(|| TranscriptionBackendError::FetchFailed("transcript document empty".into()))
    }

    async fn delete_job(&self, job_name: &str) -> Result<(), TranscriptionBackendError> {
        self.client
            .delete_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| TranscriptionBackendError::DeleteFailed(sdk_message(&e)))?;
        Ok(())
    }
}
