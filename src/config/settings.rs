use serde::Deserialize;
use std::time::Duration;

use crate::application::catalog::{CatalogError, ProviderCatalog};
use crate::application::polling::PollingPolicy;
use crate::domain::{Candidate, Capability};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub generation: GenerationSettings,
    pub translation: TranslationSettings,
    pub transcription: TranscriptionSettings,
    pub video: VideoSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Builds the immutable per-capability candidate catalog. An empty
    /// candidate list is a startup-fatal configuration error.
    pub fn provider_catalog(&self) -> Result<ProviderCatalog, CatalogError> {
        let candidates = self
            .generation
            .candidates
            .iter()
            .enumerate()
            .map(|(index, c)| Candidate::new(&c.model_id, &c.region, index as u8))
            .collect();

        ProviderCatalog::builder()
            .register(Capability::ContentGeneration, candidates)
            .build()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_storage_region")]
    pub region: String,
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    S3,
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "GenerationSettings::default_candidates")]
    pub candidates: Vec<CandidateSetting>,
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Serve generation from the deterministic offline stub instead of the
    /// real model backend.
    #[serde(default)]
    pub offline_stub: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSetting {
    pub model_id: String,
    pub region: String,
}

impl GenerationSettings {
    /// Default model preference order: DeepSeek first, then Nova, Llama,
    /// Claude, and Titan as the basic fallback, with regional alternates for
    /// the most widely available model last.
    pub fn default_candidates() -> Vec<CandidateSetting> {
        let us_east = [
            "deepseek.deepseek-v2-5-chat-v1:0",
            "deepseek.deepseek-coder-v2-instruct-v1:0",
            "amazon.nova-micro-v1:0",
            "amazon.nova-lite-v1:0",
            "amazon.nova-pro-v1:0",
            "meta.llama3-2-3b-instruct-v1:0",
            "meta.llama3-1-8b-instruct-v1:0",
            "anthropic.claude-3-5-sonnet-20241022-v2:0",
            "anthropic.claude-3-haiku-20240307-v1:0",
            "amazon.titan-text-express-v1",
        ];
        let mut candidates: Vec<CandidateSetting> = us_east
            .iter()
            .map(|model_id| CandidateSetting {
                model_id: model_id.to_string(),
                region: "us-east-1".to_string(),
            })
            .collect();
        for region in ["us-west-2", "ap-southeast-1"] {
            candidates.push(CandidateSetting {
                model_id: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
                region: region.to_string(),
            });
        }
        candidates
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSettings {
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    /// Register AWS Translate as the alternate engine for transient
    /// failures of the primary.
    #[serde(default)]
    pub enable_aws_alternate: bool,
    #[serde(default = "default_translate_region")]
    pub aws_region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    #[serde(default = "default_transcribe_region")]
    pub region: String,
    #[serde(default = "default_transcribe_language")]
    pub default_language: String,
    #[serde(default = "PollingSettings::transcription_default")]
    pub polling: PollingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSettings {
    #[serde(default = "default_video_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "PollingSettings::video_default")]
    pub polling: PollingSettings,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PollingSettings {
    pub initial_interval_secs: u64,
    pub max_interval_secs: u64,
    pub wait_budget_secs: u64,
}

impl PollingSettings {
    pub fn transcription_default() -> Self {
        Self {
            initial_interval_secs: 2,
            max_interval_secs: 30,
            wait_budget_secs: 300,
        }
    }

    pub fn video_default() -> Self {
        Self {
            initial_interval_secs: 3,
            max_interval_secs: 30,
            wait_budget_secs: 600,
        }
    }

    pub fn policy(&self) -> PollingPolicy {
        PollingPolicy::new(
            Duration::from_secs(self.initial_interval_secs),
            Duration::from_secs(self.max_interval_secs),
            Duration::from_secs(self.wait_budget_secs),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub enable_json: bool,
}

fn default_bucket() -> String {
    "lipsync-temp-media".to_string()
}

fn default_storage_region() -> String {
    "ap-southeast-1".to_string()
}

fn default_local_path() -> String {
    "./staging".to_string()
}

fn default_max_prompt_chars() -> usize {
    4000
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_translation_endpoint() -> String {
    crate::infrastructure::translation::DEFAULT_ENDPOINT.to_string()
}

fn default_translate_region() -> String {
    "us-east-1".to_string()
}

fn default_transcribe_region() -> String {
    "ap-southeast-1".to_string()
}

fn default_transcribe_language() -> String {
    "en-US".to_string()
}

fn default_video_base_url() -> String {
    crate::infrastructure::video::DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
