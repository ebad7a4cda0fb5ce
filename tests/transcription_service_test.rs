use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use palaver::application::polling::PollingPolicy;
use palaver::application::ports::{
    ArtifactStore, ArtifactStoreError, TranscriptionBackend, TranscriptionBackendError,
    TranscriptionJobState,
};
use palaver::application::services::{TranscriptionError, TranscriptionService};
use palaver::domain::{MAX_UPLOAD_BYTES, MediaUpload, StoragePath};
use palaver::infrastructure::storage::InMemoryArtifactStore;

struct ScriptedTranscribe {
    states: Mutex<VecDeque<TranscriptionJobState>>,
    started: Mutex<Vec<String>>,
    deleted_jobs: Mutex<Vec<String>>,
    transcript: &'static str,
}

impl ScriptedTranscribe {
    fn new(states: Vec<TranscriptionJobState>, transcript: &'static str) -> Arc<Self> {
        Arc::new(Self {
            states: Mutex::new(states.into()),
            started: Mutex::new(Vec::new()),
            deleted_jobs: Mutex::new(Vec::new()),
            transcript,
        })
    }

    fn started_jobs(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    fn deleted_jobs(&self) -> Vec<String> {
        self.deleted_jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionBackend for ScriptedTranscribe {
    async fn start_job(
        &self,
        job_name: &str,
        _media_uri: &str,
        _media_format: &str,
        _language_code: &str,
    ) -> Result<(), TranscriptionBackendError> {
        self.started.lock().unwrap().push(job_name.to_string());
        Ok(())
    }

    async fn job_state(
        &self,
        _job_name: &str,
    ) -> Result<TranscriptionJobState, TranscriptionBackendError> {
        // Once the script runs out the job just stays pending.
        Ok(self
            .states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TranscriptionJobState::Pending))
    }

    async fn fetch_transcript(
        &self,
        _transcript_uri: &str,
    ) -> Result<String, TranscriptionBackendError> {
        Ok(self.transcript.to_string())
    }

    async fn delete_job(&self, job_name: &str) -> Result<(), TranscriptionBackendError> {
        self.deleted_jobs.lock().unwrap().push(job_name.to_string());
        Ok(())
    }
}

/// Store whose uploads always fail, for exercising the staging error path.
struct FailingStore {
    delete_calls: Mutex<Vec<String>>,
}

impl FailingStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            delete_calls: Mutex::new(Vec::new()),
        })
    }

    fn delete_calls(&self) -> usize {
        self.delete_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ArtifactStore for FailingStore {
    async fn store(
        &self,
        _path: &StoragePath,
        _payload: Bytes,
        _content_type: &str,
    ) -> Result<u64, ArtifactStoreError> {
        Err(ArtifactStoreError::UploadFailed("bucket unreachable".into()))
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, ArtifactStoreError> {
        Err(ArtifactStoreError::NotFound(path.as_str().to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), ArtifactStoreError> {
        self.delete_calls
            .lock()
            .unwrap()
            .push(path.as_str().to_string());
        Err(ArtifactStoreError::NotFound(path.as_str().to_string()))
    }

    fn uri(&self, path: &StoragePath) -> String {
        format!("mem://{}", path.as_str())
    }

    fn public_url(&self, path: &StoragePath) -> String {
        format!("https://artifacts.invalid/{}", path.as_str())
    }
}

fn quick_policy() -> PollingPolicy {
    PollingPolicy::new(
        Duration::from_millis(5),
        Duration::from_millis(10),
        Duration::from_millis(80),
    )
}

fn service(
    store: Arc<dyn ArtifactStore>,
    backend: Arc<ScriptedTranscribe>,
) -> TranscriptionService {
    TranscriptionService::new(store, backend, quick_policy(), "en-US".to_string())
}

fn audio_upload() -> MediaUpload {
    MediaUpload::new("recording.mp3", Bytes::from_static(b"fake audio bytes"))
}

#[tokio::test]
async fn given_job_fails_on_first_poll_then_failed_and_artifact_deleted_exactly_once() {
    let store = Arc::new(InMemoryArtifactStore::new());
    let backend = ScriptedTranscribe::new(
        vec![TranscriptionJobState::Failed {
            reason: "bad media".to_string(),
        }],
        "",
    );
    let service = service(store.clone(), backend.clone());

    let result = service.transcribe(audio_upload(), None).await;

    match result {
        Err(TranscriptionError::Failed(reason)) => assert!(reason.contains("bad media")),
        other => panic!("expected failure, got {:?}", other.map(|t| t.text)),
    }
    let stored = store.stored_paths();
    assert_eq!(stored.len(), 1);
    let path = StoragePath::from_raw(stored[0].clone());
    assert_eq!(store.delete_count(&path), 1);
    assert!(!store.contains(&path));
}

#[tokio::test]
async fn given_job_never_terminal_then_timeout_and_artifact_still_deleted() {
    let store = Arc::new(InMemoryArtifactStore::new());
    let backend = ScriptedTranscribe::new(Vec::new(), "");
    let service = service(store.clone(), backend.clone());

    let result = service.transcribe(audio_upload(), None).await;

    assert!(matches!(result, Err(TranscriptionError::TimedOut(_))));
    let stored = store.stored_paths();
    assert_eq!(stored.len(), 1);
    let path = StoragePath::from_raw(stored[0].clone());
    assert_eq!(store.delete_count(&path), 1);
}

#[tokio::test]
async fn given_successful_job_then_transcript_returned_and_everything_cleaned_up() {
    let store = Arc::new(InMemoryArtifactStore::new());
    let backend = ScriptedTranscribe::new(
        vec![
            TranscriptionJobState::Pending,
            TranscriptionJobState::Completed {
                transcript_uri: "https://transcripts.invalid/job.json".to_string(),
            },
        ],
        "hello world",
    );
    let service = service(store.clone(), backend.clone());

    let transcript = service.transcribe(audio_upload(), None).await.unwrap();

    assert_eq!(transcript.text, "hello world");
    assert!(transcript.job.poll_count >= 2);
    assert_eq!(store.object_count(), 0);
    assert_eq!(backend.deleted_jobs().len(), 1);
}

#[tokio::test]
async fn given_staging_failure_then_no_job_submitted_and_cleanup_attempted() {
    let store = FailingStore::new();
    let backend = ScriptedTranscribe::new(Vec::new(), "");
    let service = service(store.clone(), backend.clone());

    let result = service.transcribe(audio_upload(), None).await;

    assert!(matches!(result, Err(TranscriptionError::Staging(_))));
    assert!(backend.started_jobs().is_empty());
    assert!(store.delete_calls() >= 1);
}

#[tokio::test]
async fn given_unsupported_extension_then_rejected_before_staging() {
    let store = Arc::new(InMemoryArtifactStore::new());
    let backend = ScriptedTranscribe::new(Vec::new(), "");
    let service = service(store.clone(), backend.clone());

    let upload = MediaUpload::new("notes.txt", Bytes::from_static(b"not audio"));
    let result = service.transcribe(upload, None).await;

    assert!(matches!(result, Err(TranscriptionError::InvalidAudio(_))));
    assert!(store.stored_paths().is_empty());
    assert!(backend.started_jobs().is_empty());
}

#[tokio::test]
async fn given_oversized_audio_then_rejected_before_staging() {
    let store = Arc::new(InMemoryArtifactStore::new());
    let backend = ScriptedTranscribe::new(Vec::new(), "");
    let service = service(store.clone(), backend.clone());

    let upload = MediaUpload::new(
        "big.wav",
        Bytes::from(vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize]),
    );
    let result = service.transcribe(upload, None).await;

    assert!(matches!(result, Err(TranscriptionError::InvalidAudio(_))));
    assert!(store.stored_paths().is_empty());
}
