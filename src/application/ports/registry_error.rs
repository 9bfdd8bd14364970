use crate::domain::{JobId, JobStatus};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("duplicate job id: {0}")]
    DuplicateId(JobId),
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("artifact name must be set exactly when completing a job")]
    ArtifactMismatch,
}
