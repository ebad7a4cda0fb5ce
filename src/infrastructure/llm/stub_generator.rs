use async_trait::async_trait;

use crate::application::ports::{GenerationRequest, TextModelBackend, TextModelError};
use crate::domain::Candidate;

/// Deterministic offline backend for scaffold mode and local development.
pub struct StubTextModel;

#[async_trait]
impl TextModelBackend for StubTextModel {
    async fn invoke(
        &self,
        candidate: &Candidate,
        request: &GenerationRequest,
    ) -> Result<String, TextModelError> {
        Ok(format!(
            "[offline {}] {}",
            candidate.model_id, request.prompt
        ))
    }
}
