use std::collections::BTreeSet;
use std::sync::Arc;

use aws_config::SdkConfig;

use crate::application::catalog::CatalogError;
use crate::application::orchestrator::Orchestrator;
use crate::application::ports::{ArtifactStoreError, TextModelBackend, TranslationBackend};
use crate::application::services::{
    GenerationService, TranscriptionService, TranslationService, VideoSynthesisService,
};
use crate::config::Settings;
use crate::infrastructure::llm::{BedrockTextModel, StubTextModel};
use crate::infrastructure::storage::ArtifactStoreFactory;
use crate::infrastructure::transcription::AwsTranscribeBackend;
use crate::infrastructure::translation::{AwsTranslator, GoogleTranslator};
use crate::infrastructure::video::GooeyLipsyncClient;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("storage: {0}")]
    Storage(#[from] ArtifactStoreError),
}

/// Wires adapters into services and services into the facade. Called once at
/// process start by the hosting web layer; everything built here is
/// immutable afterwards and shared across requests.
pub fn build_orchestrator(
    settings: &Settings,
    sdk_config: &SdkConfig,
) -> Result<Orchestrator, BootstrapError> {
    let catalog = Arc::new(settings.provider_catalog()?);
    let store = ArtifactStoreFactory::create(&settings.storage)?;

    let text_model: Arc<dyn TextModelBackend> = if settings.generation.offline_stub {
        Arc::new(StubTextModel)
    } else {
        let regions: BTreeSet<String> = settings
            .generation
            .candidates
            .iter()
            .map(|c| c.region.clone())
            .collect();
        Arc::new(BedrockTextModel::new(sdk_config, regions))
    };
    let generation = Arc::new(GenerationService::new(
        catalog,
        text_model,
        settings.generation.max_prompt_chars,
        settings.generation.max_tokens,
        settings.generation.temperature,
    ));

    let primary: Arc<dyn TranslationBackend> = Arc::new(GoogleTranslator::new(
        &settings.translation.endpoint,
        &settings.translation.api_key,
    ));
    let alternate: Option<Arc<dyn TranslationBackend>> =
        if settings.translation.enable_aws_alternate {
            Some(Arc::new(AwsTranslator::new(
                sdk_config,
                &settings.translation.aws_region,
            )))
        } else {
            None
        };
    let translation = Arc::new(TranslationService::new(primary, alternate));

    let transcribe_backend = Arc::new(AwsTranscribeBackend::new(
        sdk_config,
        &settings.transcription.region,
    ));
    let transcription = Arc::new(TranscriptionService::new(
        Arc::clone(&store),
        transcribe_backend,
        settings.transcription.polling.policy(),
        settings.transcription.default_language.clone(),
    ));

    let video_backend = Arc::new(GooeyLipsyncClient::new(
        &settings.video.base_url,
        &settings.video.api_key,
    ));
    let video = Arc::new(VideoSynthesisService::new(
        store,
        video_backend,
        settings.video.polling.policy(),
    ));

    Ok(Orchestrator::new(generation, translation, transcription, video))
}
