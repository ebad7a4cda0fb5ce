use async_trait::async_trait;

use crate::domain::{Candidate, ClassifyFailure, FailureClass};

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A text model invoked on behalf of one specific candidate. The caller owns
/// candidate ordering and failover; implementations only talk to the model
/// the candidate names.
#[async_trait]
pub trait TextModelBackend: Send + Sync {
    async fn invoke(
        &self,
        candidate: &Candidate,
        request: &GenerationRequest,
    ) -> Result<String, TextModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("model rejected the request: {0}")]
    RejectedInput(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClassifyFailure for TextModelError {
    fn class(&self) -> FailureClass {
        match self {
            // An unparseable response is treated like an outage so the next
            // candidate still gets a chance.
            TextModelError::Unavailable(_) | TextModelError::InvalidResponse(_) => {
                FailureClass::TransientBackend
            }
            TextModelError::RejectedInput(_) => FailureClass::PermanentInput,
            TextModelError::AccessDenied(_) => FailureClass::PermanentAuth,
        }
    }
}
