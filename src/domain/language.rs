use std::fmt;

/// Target languages the translation capability accepts.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "fr", "de", "it", "ja", "pt", "zh"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(code: &str) -> Result<Self, UnknownLanguage> {
        let normalized = code.trim().to_lowercase();
        if SUPPORTED_LANGUAGES.contains(&normalized.as_str()) {
            Ok(Self(normalized))
        } else {
            Err(UnknownLanguage(code.trim().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source side of a translation request. `Auto` defers detection to the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLanguage {
    Auto,
    Tagged(LanguageCode),
}

impl SourceLanguage {
    pub fn parse(code: &str) -> Result<Self, UnknownLanguage> {
        let trimmed = code.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            Ok(SourceLanguage::Auto)
        } else {
            LanguageCode::parse(trimmed).map(SourceLanguage::Tagged)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SourceLanguage::Auto => "auto",
            SourceLanguage::Tagged(code) => code.as_str(),
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);
