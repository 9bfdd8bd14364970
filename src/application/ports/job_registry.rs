use async_trait::async_trait;

use crate::domain::{Job, JobId, JobStatus};

use super::RegistryError;

/// The authoritative in-memory table of job state. Every operation is
/// atomic with respect to the others; `get` never observes a half-applied
/// `transition`.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RegistryError>;

    async fn get(&self, id: JobId) -> Result<Job, RegistryError>;

    /// Moves the job along the state machine, updating message and artifact
    /// together with the status. The artifact name is required when
    /// completing and rejected otherwise.
    async fn transition(
        &self,
        id: JobId,
        status: JobStatus,
        message: Option<&str>,
        artifact_name: Option<&str>,
    ) -> Result<Job, RegistryError>;

    /// Removes the record and returns the removed snapshot so the caller
    /// can clean up its artifact.
    async fn delete(&self, id: JobId) -> Result<Job, RegistryError>;

    async fn list(&self) -> Result<Vec<Job>, RegistryError>;
}
