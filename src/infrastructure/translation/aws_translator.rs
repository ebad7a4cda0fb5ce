use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_translate::Client;
use aws_sdk_translate::config::Region;
use aws_sdk_translate::error::ProvideErrorMetadata;

use crate::application::ports::{Translation, TranslationBackend, TranslationBackendError};
use crate::domain::{LanguageCode, SourceLanguage};

/// AWS Translate, used as the alternate engine when the primary is down.
/// The service accepts "auto" as a source language code.
pub struct AwsTranslator {
    client: Client,
}

impl AwsTranslator {
    pub fn new(sdk_config: &SdkConfig, region: &str) -> Self {
        let conf = aws_sdk_translate::config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        Self {
            client: Client::from_conf(conf),
        }
    }
}

#[async_trait]
impl TranslationBackend for AwsTranslator {
    fn engine(&self) -> &'static str {
        "aws"
    }

    #[tracing::instrument(skip(self, text), fields(source = %source, target = %target))]
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &LanguageCode,
    ) -> Result<Translation, TranslationBackendError> {
        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(source.as_str())
            .target_language_code(target.as_str())
            .send()
            .await
            .map_err(|error| {
                let message = match error.message() {
                    Some(message) => message.to_string(),
                    None => error.to_string(),
                };
                match error.code() {
                    Some("UnsupportedLanguagePairException") => {
                        TranslationBackendError::UnsupportedPair {
                            src: source.as_str().to_string(),
                            target: target.as_str().to_string(),
                        }
                    }
                    Some("AccessDeniedException") | Some("UnrecognizedClientException") => {
                        TranslationBackendError::AccessDenied(message)
                    }
                    _ => TranslationBackendError::Unavailable(message),
                }
            })?;

        Ok(Translation {
            text: output.translated_text().to_string(),
            detected_source: Some(output.source_language_code().to_string()),
        })
    }
}
