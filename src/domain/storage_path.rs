use std::fmt;

use super::job_id::JobId;
use super::source_filename::SOURCE_EXTENSION;

/// Relative location of a file inside one of the content stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// Where an uploaded original is staged. Named after the job id so
    /// client-supplied filenames never reach the filesystem.
    pub fn staged_source(job_id: &JobId) -> Self {
        Self(format!("{}.{}", job_id.as_uuid(), SOURCE_EXTENSION))
    }

    /// The per-job output directory. Each job writes artifacts only here,
    /// so completion never scans a shared directory.
    pub fn artifact_scope(job_id: &JobId) -> Self {
        Self(job_id.as_uuid().to_string())
    }

    /// A produced artifact inside the job's output directory.
    pub fn artifact(job_id: &JobId, artifact_name: &str) -> Self {
        Self(format!("{}/{}", job_id.as_uuid(), artifact_name))
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
