use std::fmt;

pub const SOURCE_EXTENSION: &str = "pdf";
pub const TARGET_EXTENSION: &str = "docx";

/// Caller-supplied name of the uploaded document, validated at the API
/// boundary. Only used for deriving the download name; staged files are
/// always named after the job id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilename(String);

impl SourceFilename {
    pub fn parse(raw: impl Into<String>) -> Result<Self, FilenameError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(FilenameError::Empty);
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(FilenameError::PathSeparator(raw));
        }
        let lower = raw.to_lowercase();
        match lower.rsplit_once('.') {
            Some((stem, ext)) if ext == SOURCE_EXTENSION && !stem.is_empty() => {
                Ok(Self(raw))
            }
            _ => Err(FilenameError::UnsupportedExtension(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The filename the artifact is served under: original stem with the
    /// extension swapped to the target format.
    pub fn download_name(&self) -> String {
        match self.0.rsplit_once('.') {
            Some((stem, _)) => format!("{}.{}", stem, TARGET_EXTENSION),
            None => format!("{}.{}", self.0, TARGET_EXTENSION),
        }
    }
}

impl fmt::Display for SourceFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilenameError {
    #[error("filename must not be empty")]
    Empty,
    #[error("filename must not contain path separators: {0}")]
    PathSeparator(String),
    #[error("unsupported file type: {0}, expected a .pdf document")]
    UnsupportedExtension(String),
}
