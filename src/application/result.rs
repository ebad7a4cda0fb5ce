use std::fmt;
use std::time::Duration;

use crate::domain::InvocationAttempt;

/// Failure categories reported across the core boundary. Exactly one applies
/// to every failed orchestration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ConfigurationError,
    AllCandidatesExhausted,
    UnsupportedLanguagePair,
    StagingFailed,
    TranscriptionFailed,
    TranscriptionTimeout,
    VideoSynthesisFailed,
    VideoSynthesisTimeout,
    TranslationServiceUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ConfigurationError => "configuration_error",
            ErrorKind::AllCandidatesExhausted => "all_candidates_exhausted",
            ErrorKind::UnsupportedLanguagePair => "unsupported_language_pair",
            ErrorKind::StagingFailed => "staging_failed",
            ErrorKind::TranscriptionFailed => "transcription_failed",
            ErrorKind::TranscriptionTimeout => "transcription_timeout",
            ErrorKind::VideoSynthesisFailed => "video_synthesis_failed",
            ErrorKind::VideoSynthesisTimeout => "video_synthesis_timeout",
            ErrorKind::TranslationServiceUnavailable => "translation_service_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum Payload {
    GeneratedText(String),
    Translation {
        text: String,
        detected_source: Option<String>,
    },
    Transcript(String),
    VideoUrl(String),
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Label of the backend that served the request, when one did.
    pub served_by: Option<String>,
    pub elapsed: Duration,
    pub attempts: Vec<InvocationAttempt>,
}

#[derive(Debug, Clone)]
pub struct OrchestrationFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// The only object handed back across the core/web-layer boundary.
#[derive(Debug, Clone)]
pub struct OrchestrationResult {
    pub success: bool,
    pub payload: Option<Payload>,
    pub diagnostics: Diagnostics,
    pub error: Option<OrchestrationFailure>,
}

impl OrchestrationResult {
    pub fn ok(payload: Payload, diagnostics: Diagnostics) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            diagnostics,
            error: None,
        }
    }

    pub fn err(kind: ErrorKind, message: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            success: false,
            payload: None,
            diagnostics,
            error: Some(OrchestrationFailure {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
