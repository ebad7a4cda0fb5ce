use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{Translation, TranslationBackend, TranslationBackendError};
use crate::domain::{LanguageCode, SourceLanguage};

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation v2 client. Omitting `source` asks the service to
/// detect the source language.
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<TranslationItem>,
}

#[derive(Deserialize)]
struct TranslationItem {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedSourceLanguage")]
    detected_source_language: Option<String>,
}

#[async_trait]
impl TranslationBackend for GoogleTranslator {
    fn engine(&self) -> &'static str {
        "google"
    }

    #[tracing::instrument(skip(self, text), fields(source = %source, target = %target))]
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target: &LanguageCode,
    ) -> Result<Translation, TranslationBackendError> {
        let mut body = json!({
            "q": text,
            "target": target.as_str(),
            "format": "text",
        });
        if let SourceLanguage::Tagged(code) = source {
            body["source"] = json!(code.as_str());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationBackendError::Unavailable(format!("request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                400 => TranslationBackendError::UnsupportedPair {
                    src: source.as_str().to_string(),
                    target: target.as_str().to_string(),
                },
                401 | 403 => TranslationBackendError::AccessDenied(error_body),
                _ => TranslationBackendError::Unavailable(format!(
                    "status {}: {}",
                    status, error_body
                )),
            });
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationBackendError::InvalidResponse(format!("parse response: {e}")))?;

        let item = parsed
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| {
                TranslationBackendError::InvalidResponse("empty translations array".into())
            })?;

        tracing::info!(chars = item.translated_text.len(), "translation completed");

        Ok(Translation {
            text: item.translated_text,
            detected_source: item.detected_source_language,
        })
    }
}
