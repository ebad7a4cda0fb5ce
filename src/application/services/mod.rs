mod generation_service;
mod transcription_service;
mod translation_service;
mod video_service;

pub use generation_service::{ContentKind, GeneratedContent, GenerationError, GenerationService};
pub use transcription_service::{Transcript, TranscriptionError, TranscriptionService};
pub use translation_service::{TranslatedText, TranslationError, TranslationService};
pub use video_service::{
    LipsyncVariant, SynthesizedVideo, VideoSynthesisError, VideoSynthesisService,
};
