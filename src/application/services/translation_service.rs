use std::sync::Arc;

use crate::application::ports::{TranslationBackend, TranslationBackendError};
use crate::domain::{LanguageCode, SourceLanguage, UnknownLanguage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedText {
    pub text: String,
    pub detected_source: Option<String>,
    pub engine: &'static str,
}

/// Single primary translation engine with an optional alternate tried only
/// on transient failures. An unsupported language pair fails fast: a second
/// engine cannot fix the request.
pub struct TranslationService {
    primary: Arc<dyn TranslationBackend>,
    alternate: Option<Arc<dyn TranslationBackend>>,
}

impl TranslationService {
    pub fn new(
        primary: Arc<dyn TranslationBackend>,
        alternate: Option<Arc<dyn TranslationBackend>>,
    ) -> Self {
        Self { primary, alternate }
    }

    #[tracing::instrument(skip(self, text))]
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslatedText, TranslationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TranslationError::EmptyText);
        }
        let source = SourceLanguage::parse(source)?;
        let target = LanguageCode::parse(target)?;

        match self.primary.translate(text, &source, &target).await {
            Ok(translation) => Ok(TranslatedText {
                text: translation.text,
                detected_source: translation.detected_source,
                engine: self.primary.engine(),
            }),
            Err(TranslationBackendError::UnsupportedPair { src, target }) => {
                Err(TranslationError::UnsupportedPair { src, target })
            }
            Err(TranslationBackendError::AccessDenied(message)) => {
                Err(TranslationError::Unavailable(message))
            }
            Err(error) => self.try_alternate(text, &source, &target, error).await,
        }
    }

    async fn try_alternate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &LanguageCode,
        primary_error: TranslationBackendError,
    ) -> Result<TranslatedText, TranslationError> {
        let Some(alternate) = &self.alternate else {
            return Err(TranslationError::Unavailable(primary_error.to_string()));
        };

        tracing::warn!(
            engine = self.primary.engine(),
            error = %primary_error,
            "primary translation engine failed, trying alternate"
        );

        match alternate.translate(text, source, target).await {
            Ok(translation) => Ok(TranslatedText {
                text: translation.text,
                detected_source: translation.detected_source,
                engine: alternate.engine(),
            }),
            Err(TranslationBackendError::UnsupportedPair { src, target }) => {
                Err(TranslationError::UnsupportedPair { src, target })
            }
            Err(alternate_error) => Err(TranslationError::Unavailable(format!(
                "{} ({}: {})",
                primary_error,
                alternate.engine(),
                alternate_error
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("no text provided for translation")]
    EmptyText,
    #[error(transparent)]
    UnknownLanguage(#[from] UnknownLanguage),
    #[error("unsupported language pair: {src} -> {target}")]
    UnsupportedPair { src: String, target: String },
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
}
