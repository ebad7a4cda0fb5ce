use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// Unique object key for a temporary media upload, e.g.
    /// `media/transcribe-3f2a....mp3`.
    pub fn for_upload(prefix: &str, extension: &str) -> Self {
        Self(format!("media/{}-{}.{}", prefix, Uuid::new_v4(), extension))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Pending,
    Staged,
    Consumed,
    Deleted,
}

/// A temporary binary object staged in external storage for backend
/// consumption. Owned by the orchestration call that created it; must reach
/// `Deleted` on every exit path.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: StoragePath,
    pub content_type: String,
    pub state: ArtifactState,
}

impl Artifact {
    pub fn pending(path: StoragePath, content_type: impl Into<String>) -> Self {
        Self {
            path,
            content_type: content_type.into(),
            state: ArtifactState::Pending,
        }
    }

    pub fn mark_staged(&mut self) {
        self.state = ArtifactState::Staged;
    }

    pub fn mark_consumed(&mut self) {
        self.state = ArtifactState::Consumed;
    }

    pub fn mark_deleted(&mut self) {
        self.state = ArtifactState::Deleted;
    }
}
