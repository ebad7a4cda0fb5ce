use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ContentGeneration,
    Translation,
    Transcription,
    VideoSynthesis,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ContentGeneration => "content-generation",
            Capability::Translation => "translation",
            Capability::Transcription => "transcription",
            Capability::VideoSynthesis => "video-synthesis",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked (model, region) option for serving a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub model_id: String,
    pub region: String,
    pub rank: u8,
}

impl Candidate {
    pub fn new(model_id: impl Into<String>, region: impl Into<String>, rank: u8) -> Self {
        Self {
            model_id: model_id.into(),
            region: region.into(),
            rank,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.model_id, self.region)
    }
}
