use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::application::ports::{JobRegistry, RegistryError};
use crate::domain::{Job, JobId, JobStatus};

/// Registry backed by an in-process map. Not durable across restarts;
/// callers get cloned snapshots, never references into the map.
pub struct InMemoryJobRegistry {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRegistry for InMemoryJobRegistry {
    async fn create(&self, job: &Job) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.lock().await;
        if jobs.contains_key(&job.id) {
            return Err(RegistryError::DuplicateId(job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Job, RegistryError> {
        let jobs = self.jobs.lock().await;
        jobs.get(&id).cloned().ok_or(RegistryError::NotFound(id))
    }

    async fn transition(
        &self,
        id: JobId,
        status: JobStatus,
        message: Option<&str>,
        artifact_name: Option<&str>,
    ) -> Result<Job, RegistryError> {
        match (status, artifact_name) {
            (JobStatus::Completed, None) => return Err(RegistryError::ArtifactMismatch),
            (s, Some(_)) if s != JobStatus::Completed => {
                return Err(RegistryError::ArtifactMismatch)
            }
            _ => {}
        }

        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if !job.status.can_transition_to(status) {
            return Err(RegistryError::InvalidTransition {
                from: job.status,
                to: status,
            });
        }

        job.status = status;
        job.message = message.map(str::to_string);
        job.artifact_name = artifact_name.map(str::to_string);
        job.updated_at = Utc::now();

        Ok(job.clone())
    }

    async fn delete(&self, id: JobId) -> Result<Job, RegistryError> {
        let mut jobs = self.jobs.lock().await;
        jobs.remove(&id).ok_or(RegistryError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Job>, RegistryError> {
        let jobs = self.jobs.lock().await;
        Ok(jobs.values().cloned().collect())
    }
}
