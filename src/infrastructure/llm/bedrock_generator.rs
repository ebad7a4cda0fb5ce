use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::config::Region;
use aws_sdk_bedrockruntime::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, ReasoningContentBlock,
};
use serde_json::{Value, json};

use crate::application::ports::{GenerationRequest, TextModelBackend, TextModelError};
use crate::domain::Candidate;

// Reasoning models stream their thinking into the same token budget as the
// answer, so the converse path gets more headroom.
const REASONING_MAX_TOKENS: u32 = 1000;
const CONVERSE_TOP_P: f32 = 0.9;

/// Bedrock runtime backend. Every model family on the candidate list speaks
/// a different request/response dialect; this adapter shapes the payload per
/// family and normalizes the reply to plain text.
pub struct BedrockTextModel {
    clients: HashMap<String, Client>,
}

impl BedrockTextModel {
    /// One client per region the catalog references, all derived from the
    /// shared SDK configuration loaded at process start.
    pub fn new(sdk_config: &SdkConfig, regions: impl IntoIterator<Item = String>) -> Self {
        let mut clients = HashMap::new();
        for region in regions {
            let conf = aws_sdk_bedrockruntime::config::Builder::from(sdk_config)
                .region(Region::new(region.clone()))
                .build();
            clients.insert(region, Client::from_conf(conf));
        }
        Self { clients }
    }

    fn client_for(&self, region: &str) -> Result<&Client, TextModelError> {
        self.clients.get(region).ok_or_else(|| {
            TextModelError::Unavailable(format!("no client configured for region {region}"))
        })
    }

    async fn converse(
        &self,
        client: &Client,
        candidate: &Candidate,
        request: &GenerationRequest,
    ) -> Result<String, TextModelError> {
        let prompt = format!(
            "Please provide a direct, concise answer without showing your reasoning process.\n\n{}\n\nUser request: {}\n\nProvide only the final content:",
            request.system_prompt, request.prompt
        );
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt))
            .build()
            .map_err(|e| TextModelError::InvalidResponse(e.to_string()))?;
        let inference = InferenceConfiguration::builder()
            .max_tokens(request.max_tokens.max(REASONING_MAX_TOKENS) as i32)
            .temperature(request.temperature)
            .top_p(CONVERSE_TOP_P)
            .build();

        let output = client
            .converse()
            .model_id(&candidate.model_id)
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(classify_bedrock_error)?;

        let reply = output
            .output()
            .ok_or_else(|| TextModelError::InvalidResponse("response missing output".into()))?;
        let message = reply.as_message().map_err(|_| {
            TextModelError::InvalidResponse("response output is not a message".into())
        })?;

        for block in message.content() {
            if let ContentBlock::Text(text) = block {
                return Ok(text.trim().to_string());
            }
        }
        for block in message.content() {
            if let ContentBlock::ReasoningContent(ReasoningContentBlock::ReasoningText(reasoning)) =
                block
            {
                return Ok(final_answer_from_reasoning(reasoning.text()));
            }
        }
        Err(TextModelError::InvalidResponse(
            "no text content in converse response".into(),
        ))
    }

    async fn invoke_model(
        &self,
        client: &Client,
        candidate: &Candidate,
        request: &GenerationRequest,
        family: InvokeFamily,
    ) -> Result<String, TextModelError> {
        let body = request_body(family, request);
        let bytes = serde_json::to_vec(&body)
            .map_err(|e| TextModelError::InvalidResponse(format!("encode request: {e}")))?;

        let output = client
            .invoke_model()
            .model_id(&candidate.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(bytes))
            .send()
            .await
            .map_err(classify_bedrock_error)?;

        let parsed: Value = serde_json::from_slice(output.body().as_ref())
            .map_err(|e| TextModelError::InvalidResponse(format!("parse response: {e}")))?;

        extract_text(family, &parsed)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                TextModelError::InvalidResponse(format!(
                    "no text in {} response",
                    candidate.model_id
                ))
            })
    }
}

#[async_trait]
impl TextModelBackend for BedrockTextModel {
    #[tracing::instrument(skip(self, request), fields(model = %candidate.model_id, region = %candidate.region))]
    async fn invoke(
        &self,
        candidate: &Candidate,
        request: &GenerationRequest,
    ) -> Result<String, TextModelError> {
        let client = self.client_for(&candidate.region)?;
        match ModelFamily::of(&candidate.model_id) {
            ModelFamily::InferenceProfile => self.converse(client, candidate, request).await,
            ModelFamily::Invoke(family) => {
                self.invoke_model(client, candidate, request, family).await
            }
        }
    }
}

enum ModelFamily {
    /// Inference-profile ARNs only answer on the converse API.
    InferenceProfile,
    Invoke(InvokeFamily),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvokeFamily {
    DeepSeek,
    Nova,
    Llama,
    Claude,
    Titan,
}

impl ModelFamily {
    fn of(model_id: &str) -> Self {
        if model_id.starts_with("arn:aws:bedrock:") && model_id.contains("inference-profile") {
            return ModelFamily::InferenceProfile;
        }
        let family = if model_id.contains("deepseek") {
            InvokeFamily::DeepSeek
        } else if model_id.contains("nova") {
            InvokeFamily::Nova
        } else if model_id.contains("llama") {
            InvokeFamily::Llama
        } else if model_id.contains("titan") {
            InvokeFamily::Titan
        } else {
            InvokeFamily::Claude
        };
        ModelFamily::Invoke(family)
    }
}

fn request_body(family: InvokeFamily, request: &GenerationRequest) -> Value {
    match family {
        InvokeFamily::DeepSeek => json!({
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.prompt},
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        }),
        InvokeFamily::Nova | InvokeFamily::Titan => json!({
            "inputText": format!("{}\n\nUser: {}", request.system_prompt, request.prompt),
            "textGenerationConfig": {
                "maxTokenCount": request.max_tokens,
                "temperature": request.temperature,
            },
        }),
        InvokeFamily::Llama => json!({
            "prompt": format!(
                "System: {}\n\nUser: {}\n\nAssistant:",
                request.system_prompt, request.prompt
            ),
            "max_gen_len": request.max_tokens,
            "temperature": request.temperature,
        }),
        InvokeFamily::Claude => json!({
            "anthropic_version": "bedrock-2023-05-31",
            "max_tokens": request.max_tokens,
            "system": request.system_prompt,
            "messages": [{"role": "user", "content": request.prompt}],
        }),
    }
}

fn extract_text(family: InvokeFamily, body: &Value) -> Option<String> {
    let text = match family {
        InvokeFamily::DeepSeek => body["choices"][0]["message"]["content"].as_str(),
        InvokeFamily::Nova => body["outputText"].as_str(),
        InvokeFamily::Titan => body["results"][0]["outputText"].as_str(),
        InvokeFamily::Llama => body["generation"].as_str(),
        InvokeFamily::Claude => body["content"][0]["text"].as_str(),
    };
    text.map(str::to_string)
}

/// Pulls a usable final answer out of a reasoning trace when the model never
/// emitted a plain text block. Scans from the end, skipping lines that read
/// like thinking-aloud rather than content.
fn final_answer_from_reasoning(reasoning: &str) -> String {
    const CHATTER: &[&str] = &[
        "Let me", "I need", "The user", "Wait", "Hmm", "Maybe", "So", "Okay",
    ];
    for line in reasoning.lines().rev() {
        let line = line.trim();
        if !line.is_empty() && !CHATTER.iter().any(|prefix| line.starts_with(prefix)) {
            return line.to_string();
        }
    }
    reasoning.trim().to_string()
}

fn classify_bedrock_error<E, R>(error: SdkError<E, R>) -> TextModelError
where
    E: ProvideErrorMetadata,
{
    let code = error.code().map(str::to_string);
    let message = match error.message() {
        Some(message) => message.to_string(),
        None => error.to_string(),
    };
    match code.as_deref() {
        Some("AccessDeniedException") => TextModelError::AccessDenied(message),
        Some("ValidationException") => TextModelError::RejectedInput(message),
        _ => TextModelError::Unavailable(message),
    }
}
