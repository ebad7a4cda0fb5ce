use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{
    LipsyncSource, LipsyncSubmission, SubmittedVideoJob, VideoBackendError, VideoJobState,
    VideoSynthesisBackend,
};

pub const DEFAULT_BASE_URL: &str = "https://api.gooey.ai";

// Voice used when the provider synthesizes speech from a text prompt.
const TTS_PROVIDER: &str = "OPEN_AI";

/// Gooey.AI Lipsync client. Submission returns a run id plus a status URL;
/// the run is observed by polling that URL until it reports a terminal
/// status.
pub struct GooeyLipsyncClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooeyLipsyncClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    run_id: String,
    status_url: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    detail: Option<String>,
    output: Option<StatusOutput>,
}

#[derive(Deserialize)]
struct StatusOutput {
    output_video: Option<String>,
}

#[async_trait]
impl VideoSynthesisBackend for GooeyLipsyncClient {
    #[tracing::instrument(skip(self, submission))]
    async fn submit(
        &self,
        submission: &LipsyncSubmission,
    ) -> Result<SubmittedVideoJob, VideoBackendError> {
        let (endpoint, body) = match &submission.source {
            LipsyncSource::Text(text) => (
                format!("{}/v3/LipsyncTTS/async", self.base_url),
                json!({
                    "text_prompt": text,
                    "tts_provider": TTS_PROVIDER,
                    "input_face": submission.face_url,
                }),
            ),
            LipsyncSource::AudioUrl(audio_url) => (
                format!("{}/v3/Lipsync/async", self.base_url),
                json!({
                    "input_audio": audio_url,
                    "input_face": submission.face_url,
                }),
            ),
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VideoBackendError::Unavailable(format!("request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                400 | 422 => VideoBackendError::RejectedInput(error_body),
                401 | 403 => VideoBackendError::AccessDenied(error_body),
                _ => VideoBackendError::Unavailable(format!("status {}: {}", status, error_body)),
            });
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|e| VideoBackendError::InvalidResponse(format!("parse response: {e}")))?;

        tracing::info!(run_id = %parsed.run_id, "lipsync run submitted");

        Ok(SubmittedVideoJob {
            job_id: parsed.run_id,
            status_url: parsed.status_url,
        })
    }

    async fn poll(&self, job: &SubmittedVideoJob) -> Result<VideoJobState, VideoBackendError> {
        let response = self
            .client
            .get(&job.status_url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| VideoBackendError::Unavailable(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(VideoBackendError::Unavailable(format!(
                "status {}: {}",
                status, error_body
            )));
        }

        let parsed: StatusResponse = response
            .json()
            .await
            .map_err(|e| VideoBackendError::InvalidResponse(format!("parse response: {e}")))?;

        match parsed.status.as_str() {
            "completed" => parsed
                .output
                .and_then(|o| o.output_video)
                .map(|video_url| VideoJobState::Completed { video_url })
                .ok_or_else(|| {
                    VideoBackendError::InvalidResponse("completed run missing output video".into())
                }),
            "failed" => Ok(VideoJobState::Failed {
                reason: parsed.detail.unwrap_or_else(|| "unknown".to_string()),
            }),
            "queued" | "starting" | "running" => Ok(VideoJobState::Running),
            other => Err(VideoBackendError::InvalidResponse(format!(
                "unknown run status: {other}"
            ))),
        }
    }
}
