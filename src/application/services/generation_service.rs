use std::sync::Arc;

use crate::application::catalog::{CatalogError, ProviderCatalog};
use crate::application::failover::{FailoverError, invoke_with_failover};
use crate::application::ports::{GenerationRequest, TextModelBackend};
use crate::domain::{Candidate, Capability, FailureClass, InvocationAttempt, LanguageCode};

/// Per-request hint selecting the system prompt the model is steered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Script,
    Voice,
    General,
}

impl ContentKind {
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_lowercase().as_str() {
            "script" => ContentKind::Script,
            "voice" => ContentKind::Voice,
            _ => ContentKind::General,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            ContentKind::Script => {
                "You are a professional scriptwriter. Create engaging video scripts that are clear, compelling, and under 200 words."
            }
            ContentKind::Voice => {
                "You are a voice-over specialist. Create professional narration that's easy to speak and engaging to listen to, under 200 words."
            }
            ContentKind::General => {
                "You are a content creator. Generate engaging, informative content under 200 words."
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub text: String,
    pub served_by: Candidate,
    pub attempts: Vec<InvocationAttempt>,
}

pub struct GenerationService {
    catalog: Arc<ProviderCatalog>,
    backend: Arc<dyn TextModelBackend>,
    max_prompt_chars: usize,
    max_tokens: u32,
    temperature: f32,
}

impl GenerationService {
    pub fn new(
        catalog: Arc<ProviderCatalog>,
        backend: Arc<dyn TextModelBackend>,
        max_prompt_chars: usize,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            catalog,
            backend,
            max_prompt_chars,
            max_tokens,
            temperature,
        }
    }

    #[tracing::instrument(skip(self, prompt), fields(kind = ?kind))]
    pub async fn generate(
        &self,
        prompt: &str,
        kind: ContentKind,
        language: Option<&LanguageCode>,
    ) -> Result<GeneratedContent, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        if prompt.chars().count() > self.max_prompt_chars {
            return Err(GenerationError::PromptTooLong {
                max: self.max_prompt_chars,
            });
        }

        let candidates = self.catalog.candidates(Capability::ContentGeneration)?;

        let mut system_prompt = kind.system_prompt().to_string();
        if let Some(language) = language {
            system_prompt.push_str(&format!(" Respond in the language with code {}.", language));
        }
        let request = Arc::new(GenerationRequest {
            system_prompt,
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        });

        let backend = Arc::clone(&self.backend);
        let outcome = invoke_with_failover(candidates, |candidate| {
            let backend = Arc::clone(&backend);
            let request = Arc::clone(&request);
            async move { backend.invoke(&candidate, &request).await }
        })
        .await;

        match outcome {
            Ok(success) => {
                tracing::info!(
                    candidate = %success.served_by,
                    chars = success.value.len(),
                    "content generated"
                );
                Ok(GeneratedContent {
                    text: success.value.trim().to_string(),
                    served_by: success.served_by,
                    attempts: success.attempts,
                })
            }
            Err(FailoverError::AllCandidatesExhausted { attempts }) => {
                Err(GenerationError::Exhausted { attempts })
            }
            Err(FailoverError::Aborted {
                candidate,
                class,
                error,
                attempts,
            }) => Err(GenerationError::Rejected {
                candidate,
                class,
                message: error.to_string(),
                attempts,
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("prompt exceeds {max} characters")]
    PromptTooLong { max: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("all {} content model candidates failed", .attempts.len())]
    Exhausted { attempts: Vec<InvocationAttempt> },
    #[error("model {candidate} rejected the request: {message}")]
    Rejected {
        candidate: Candidate,
        class: FailureClass,
        message: String,
        attempts: Vec<InvocationAttempt>,
    },
}
