use async_trait::async_trait;

use crate::domain::{LanguageCode, SourceLanguage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub detected_source: Option<String>,
}

#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Short engine label for diagnostics, e.g. "google" or "aws".
    fn engine(&self) -> &'static str;

    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &LanguageCode,
    ) -> Result<Translation, TranslationBackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationBackendError {
    #[error("unsupported language pair: {src} -> {target}")]
    UnsupportedPair { src: String, target: String },
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
