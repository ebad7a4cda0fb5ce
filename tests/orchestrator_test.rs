use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use palaver::application::catalog::ProviderCatalog;
use palaver::application::orchestrator::Orchestrator;
use palaver::application::polling::PollingPolicy;
use palaver::application::ports::{
    ArtifactStore, GenerationRequest, LipsyncSubmission, SubmittedVideoJob, TextModelBackend,
    TextModelError,
    TranscriptionBackend, TranscriptionBackendError, TranscriptionJobState, Translation,
    TranslationBackend, TranslationBackendError, VideoBackendError, VideoJobState,
    VideoSynthesisBackend,
};
use palaver::application::result::{ErrorKind, Payload};
use palaver::application::services::{
    GenerationService, TranscriptionService, TranslationService, VideoSynthesisService,
};
use palaver::domain::{Candidate, Capability, LanguageCode, SourceLanguage};
use palaver::infrastructure::storage::InMemoryArtifactStore;

const HAIKU: &str = "Rain taps on the roof\nPuddles gather in the street\nClouds drift slowly by";

struct FixedTextModel;

#[async_trait]
impl TextModelBackend for FixedTextModel {
    async fn invoke(
        &self,
        _candidate: &Candidate,
        _request: &GenerationRequest,
    ) -> Result<String, TextModelError> {
        Ok(HAIKU.to_string())
    }
}

struct EchoTranslator;

#[async_trait]
impl TranslationBackend for EchoTranslator {
    fn engine(&self) -> &'static str {
        "stub"
    }

    async fn translate(
        &self,
        text: &str,
        _source: &SourceLanguage,
        target: &LanguageCode,
    ) -> Result<Translation, TranslationBackendError> {
        if target.as_str() == "zh" {
            return Err(TranslationBackendError::UnsupportedPair {
                src: "auto".to_string(),
                target: target.as_str().to_string(),
            });
        }
        Ok(Translation {
            text: format!("{}:{}", target.as_str(), text),
            detected_source: Some("en".to_string()),
        })
    }
}

struct PendingForeverTranscribe;

#[async_trait]
impl TranscriptionBackend for PendingForeverTranscribe {
    async fn start_job(
        &self,
        _job_name: &str,
        _media_uri: &str,
        _media_format: &str,
        _language_code: &str,
    ) -> Result<(), TranscriptionBackendError> {
        Ok(())
    }

    async fn job_state(
        &self,
        _job_name: &str,
    ) -> Result<TranscriptionJobState, TranscriptionBackendError> {
        Ok(TranscriptionJobState::Pending)
    }

    async fn fetch_transcript(
        &self,
        _transcript_uri: &str,
    ) -> Result<String, TranscriptionBackendError> {
        Ok(String::new())
    }

    async fn delete_job(&self, _job_name: &str) -> Result<(), TranscriptionBackendError> {
        Ok(())
    }
}

struct IdleVideoBackend;

#[async_trait]
impl VideoSynthesisBackend for IdleVideoBackend {
    async fn submit(
        &self,
        _submission: &LipsyncSubmission,
    ) -> Result<SubmittedVideoJob, VideoBackendError> {
        Ok(SubmittedVideoJob {
            job_id: "run-1".to_string(),
            status_url: "https://status.invalid/run-1".to_string(),
        })
    }

    async fn poll(&self, _job: &SubmittedVideoJob) -> Result<VideoJobState, VideoBackendError> {
        Ok(VideoJobState::Running)
    }
}

fn quick_policy() -> PollingPolicy {
    PollingPolicy::new(
        Duration::from_millis(5),
        Duration::from_millis(10),
        Duration::from_millis(50),
    )
}

fn orchestrator() -> Orchestrator {
    let catalog = Arc::new(
        ProviderCatalog::builder()
            .register(
                Capability::ContentGeneration,
                vec![Candidate::new("haiku-model", "us-east-1", 0)],
            )
            .build()
            .unwrap(),
    );
    let store: Arc<dyn ArtifactStore> = Arc::new(InMemoryArtifactStore::new());

    let generation = Arc::new(GenerationService::new(
        catalog,
        Arc::new(FixedTextModel),
        4000,
        500,
        0.7,
    ));
    let translation = Arc::new(TranslationService::new(Arc::new(EchoTranslator), None));
    let transcription = Arc::new(TranscriptionService::new(
        Arc::clone(&store),
        Arc::new(PendingForeverTranscribe),
        quick_policy(),
        "en-US".to_string(),
    ));
    let video = Arc::new(VideoSynthesisService::new(
        store,
        Arc::new(IdleVideoBackend),
        quick_policy(),
    ));

    Orchestrator::new(generation, translation, transcription, video)
}

#[tokio::test]
async fn given_haiku_prompt_then_success_with_exact_text_and_serving_candidate() {
    let orchestrator = orchestrator();

    let result = orchestrator
        .generate_content("Write a haiku about rain", "script", None)
        .await;

    assert!(result.success);
    match result.payload {
        Some(Payload::GeneratedText(text)) => assert_eq!(text, HAIKU),
        other => panic!("unexpected payload: {:?}", other),
    }
    assert_eq!(
        result.diagnostics.served_by.as_deref(),
        Some("haiku-model@us-east-1")
    );
    assert_eq!(result.diagnostics.attempts.len(), 1);
}

#[tokio::test]
async fn given_empty_prompt_then_invalid_input_kind() {
    let orchestrator = orchestrator();

    let result = orchestrator.generate_content("   ", "script", None).await;

    assert!(!result.success);
    assert_eq!(result.error_kind(), Some(ErrorKind::InvalidInput));
}

#[tokio::test]
async fn given_translate_call_then_translation_payload_with_engine() {
    let orchestrator = orchestrator();

    let result = orchestrator.translate("Hello", "en", "es").await;

    assert!(result.success);
    match result.payload {
        Some(Payload::Translation { text, .. }) => assert_eq!(text, "es:Hello"),
        other => panic!("unexpected payload: {:?}", other),
    }
    assert_eq!(result.diagnostics.served_by.as_deref(), Some("stub"));
}

#[tokio::test]
async fn given_unsupported_pair_then_matching_error_kind() {
    let orchestrator = orchestrator();

    let result = orchestrator.translate("Hello", "en", "zh").await;

    assert!(!result.success);
    assert_eq!(result.error_kind(), Some(ErrorKind::UnsupportedLanguagePair));
}

#[tokio::test]
async fn given_stalled_transcription_job_then_timeout_kind() {
    let orchestrator = orchestrator();

    let result = orchestrator
        .transcribe(Bytes::from_static(b"fake audio"), "voice.mp3", None)
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind(), Some(ErrorKind::TranscriptionTimeout));
}

#[tokio::test]
async fn given_unknown_audio_type_then_invalid_input_kind() {
    let orchestrator = orchestrator();

    let result = orchestrator
        .transcribe(Bytes::from_static(b"bytes"), "document.pdf", None)
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind(), Some(ErrorKind::InvalidInput));
}
