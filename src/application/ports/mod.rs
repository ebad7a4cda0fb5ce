mod artifact_store;
mod text_model;
mod transcriber;
mod translator;
mod video;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use text_model::{GenerationRequest, TextModelBackend, TextModelError};
pub use transcriber::{TranscriptionBackend, TranscriptionBackendError, TranscriptionJobState};
pub use translator::{Translation, TranslationBackend, TranslationBackendError};
pub use video::{
    LipsyncSource, LipsyncSubmission, SubmittedVideoJob, VideoBackendError, VideoJobState,
    VideoSynthesisBackend,
};
