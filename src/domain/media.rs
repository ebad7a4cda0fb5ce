use bytes::Bytes;

pub const ALLOWED_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac", "webm"];
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const MAX_LIPSYNC_AUDIO_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Audio => ALLOWED_AUDIO_EXTENSIONS,
            MediaKind::Image => ALLOWED_IMAGE_EXTENSIONS,
        }
    }
}

pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "mp4" | "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// A file the collaborator received from the user, already read into memory.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl MediaUpload {
    pub fn new(filename: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaValidationError {
    #[error("{0} file is empty")]
    Empty(&'static str),
    #[error("filename {0:?} has no extension")]
    MissingExtension(String),
    #[error("invalid {kind} file type .{extension}, allowed: {allowed}")]
    UnsupportedExtension {
        kind: &'static str,
        extension: String,
        allowed: String,
    },
    #[error("{kind} file too large: {size} bytes (max {max})")]
    TooLarge {
        kind: &'static str,
        size: u64,
        max: u64,
    },
}

/// Checks an upload against the allow-list and size cap for its kind and
/// returns the lowercased extension.
pub fn validate_upload(
    upload: &MediaUpload,
    kind: MediaKind,
    max_bytes: u64,
) -> Result<String, MediaValidationError> {
    if upload.bytes.is_empty() {
        return Err(MediaValidationError::Empty(kind.as_str()));
    }
    let extension = upload
        .extension()
        .ok_or_else(|| MediaValidationError::MissingExtension(upload.filename.clone()))?;
    if !kind.allowed_extensions().contains(&extension.as_str()) {
        return Err(MediaValidationError::UnsupportedExtension {
            kind: kind.as_str(),
            extension,
            allowed: kind.allowed_extensions().join(", "),
        });
    }
    if upload.size() > max_bytes {
        return Err(MediaValidationError::TooLarge {
            kind: kind.as_str(),
            size: upload.size(),
            max: max_bytes,
        });
    }
    Ok(extension)
}
