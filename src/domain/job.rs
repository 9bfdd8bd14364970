use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, SourceFilename, StoragePath};

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub message: Option<String>,
    pub original_filename: SourceFilename,
    pub artifact_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, original_filename: SourceFilename) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Pending,
            message: Some("Waiting to be processed".to_string()),
            original_filename,
            artifact_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Location of the produced artifact, present only on completed jobs.
    pub fn artifact_path(&self) -> Option<StoragePath> {
        self.artifact_name
            .as_deref()
            .map(|name| StoragePath::artifact(&self.id, name))
    }
}
