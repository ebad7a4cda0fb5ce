use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;

use crate::application::result::{Diagnostics, ErrorKind, OrchestrationResult, Payload};
use crate::application::services::{
    ContentKind, GenerationError, GenerationService, LipsyncVariant, TranscriptionError,
    TranscriptionService, TranslationError, TranslationService, VideoSynthesisError,
    VideoSynthesisService,
};
use crate::domain::{FailureClass, LanguageCode, MediaUpload};

/// The boundary the web layer calls. Each method is synchronous from the
/// caller's perspective: it returns only after terminal success, failure, or
/// timeout, with polling hidden behind the call.
pub struct Orchestrator {
    generation: Arc<GenerationService>,
    translation: Arc<TranslationService>,
    transcription: Arc<TranscriptionService>,
    video: Arc<VideoSynthesisService>,
}

impl Orchestrator {
    pub fn new(
        generation: Arc<GenerationService>,
        translation: Arc<TranslationService>,
        transcription: Arc<TranscriptionService>,
        video: Arc<VideoSynthesisService>,
    ) -> Self {
        Self {
            generation,
            translation,
            transcription,
            video,
        }
    }

    pub async fn generate_content(
        &self,
        prompt: &str,
        content_type: &str,
        language: Option<&str>,
    ) -> OrchestrationResult {
        let started = Instant::now();
        let kind = ContentKind::from_hint(content_type);

        let language = match language.map(LanguageCode::parse).transpose() {
            Ok(language) => language,
            Err(error) => {
                return OrchestrationResult::err(
                    ErrorKind::InvalidInput,
                    error.to_string(),
                    elapsed_only(started),
                );
            }
        };

        match self.generation.generate(prompt, kind, language.as_ref()).await {
            Ok(content) => OrchestrationResult::ok(
                Payload::GeneratedText(content.text),
                Diagnostics {
                    served_by: Some(content.served_by.to_string()),
                    elapsed: started.elapsed(),
                    attempts: content.attempts,
                },
            ),
            Err(error) => {
                let (kind, attempts) = match &error {
                    GenerationError::EmptyPrompt | GenerationError::PromptTooLong { .. } => {
                        (ErrorKind::InvalidInput, Vec::new())
                    }
                    GenerationError::Catalog(_) => (ErrorKind::ConfigurationError, Vec::new()),
                    GenerationError::Exhausted { attempts } => {
                        (ErrorKind::AllCandidatesExhausted, attempts.clone())
                    }
                    GenerationError::Rejected {
                        class, attempts, ..
                    } => {
                        // A missing credential is a deployment problem, not a
                        // caller problem.
                        let kind = match class {
                            FailureClass::PermanentAuth => ErrorKind::ConfigurationError,
                            _ => ErrorKind::InvalidInput,
                        };
                        (kind, attempts.clone())
                    }
                };
                OrchestrationResult::err(
                    kind,
                    error.to_string(),
                    Diagnostics {
                        served_by: None,
                        elapsed: started.elapsed(),
                        attempts,
                    },
                )
            }
        }
    }

    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> OrchestrationResult {
        let started = Instant::now();
        match self.translation.translate(text, source_lang, target_lang).await {
            Ok(translated) => OrchestrationResult::ok(
                Payload::Translation {
                    text: translated.text,
                    detected_source: translated.detected_source,
                },
                Diagnostics {
                    served_by: Some(translated.engine.to_string()),
                    elapsed: started.elapsed(),
                    attempts: Vec::new(),
                },
            ),
            Err(error) => {
                let kind = match &error {
                    TranslationError::EmptyText | TranslationError::UnknownLanguage(_) => {
                        ErrorKind::InvalidInput
                    }
                    TranslationError::UnsupportedPair { .. } => ErrorKind::UnsupportedLanguagePair,
                    TranslationError::Unavailable(_) => ErrorKind::TranslationServiceUnavailable,
                };
                OrchestrationResult::err(kind, error.to_string(), elapsed_only(started))
            }
        }
    }

    pub async fn transcribe(
        &self,
        audio_bytes: Bytes,
        filename: &str,
        language: Option<&str>,
    ) -> OrchestrationResult {
        let started = Instant::now();
        let upload = MediaUpload::new(filename, audio_bytes);
        match self.transcription.transcribe(upload, language).await {
            Ok(transcript) => OrchestrationResult::ok(
                Payload::Transcript(transcript.text),
                Diagnostics {
                    served_by: Some(transcript.job.remote_name.clone()),
                    elapsed: started.elapsed(),
                    attempts: Vec::new(),
                },
            ),
            Err(error) => {
                let kind = match &error {
                    TranscriptionError::InvalidAudio(_) => ErrorKind::InvalidInput,
                    TranscriptionError::Staging(_) => ErrorKind::StagingFailed,
                    TranscriptionError::Failed(_) => ErrorKind::TranscriptionFailed,
                    TranscriptionError::TimedOut(_) => ErrorKind::TranscriptionTimeout,
                };
                OrchestrationResult::err(kind, error.to_string(), elapsed_only(started))
            }
        }
    }

    pub async fn synthesize_video(&self, variant: LipsyncVariant) -> OrchestrationResult {
        let started = Instant::now();
        match self.video.synthesize(variant).await {
            Ok(video) => OrchestrationResult::ok(
                Payload::VideoUrl(video.video_url),
                Diagnostics {
                    served_by: Some(video.job.remote_name.clone()),
                    elapsed: started.elapsed(),
                    attempts: Vec::new(),
                },
            ),
            Err(error) => {
                let kind = match &error {
                    VideoSynthesisError::InvalidMedia { .. }
                    | VideoSynthesisError::EmptyText
                    | VideoSynthesisError::EmptyFaceUrl => ErrorKind::InvalidInput,
                    VideoSynthesisError::Staging(_) => ErrorKind::StagingFailed,
                    VideoSynthesisError::Rejected(_) | VideoSynthesisError::Failed(_) => {
                        ErrorKind::VideoSynthesisFailed
                    }
                    VideoSynthesisError::TimedOut(_) => ErrorKind::VideoSynthesisTimeout,
                };
                OrchestrationResult::err(kind, error.to_string(), elapsed_only(started))
            }
        }
    }
}

fn elapsed_only(started: Instant) -> Diagnostics {
    Diagnostics {
        served_by: None,
        elapsed: started.elapsed(),
        attempts: Vec::new(),
    }
}
