mod artifact;
mod async_job;
mod attempt;
mod candidate;
mod language;
mod media;

pub use artifact::{Artifact, ArtifactState, StoragePath};
pub use async_job::{AsyncJob, JobId, JobStatus};
pub use attempt::{AttemptOutcome, ClassifyFailure, FailureClass, InvocationAttempt};
pub use candidate::{Candidate, Capability};
pub use language::{LanguageCode, SUPPORTED_LANGUAGES, SourceLanguage, UnknownLanguage};
pub use media::{
    ALLOWED_AUDIO_EXTENSIONS, ALLOWED_IMAGE_EXTENSIONS, MAX_LIPSYNC_AUDIO_BYTES, MAX_UPLOAD_BYTES,
    MediaKind, MediaUpload, MediaValidationError, mime_for_extension, validate_upload,
};
