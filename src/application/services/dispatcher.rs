use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRegistry, RegistryError};
use crate::domain::{Job, JobId, SourceFilename, StoragePath};

/// One queued conversion. The job id is the correlation key; the worker
/// looks everything else up in the registry.
pub struct ConversionRequest {
    pub job_id: JobId,
    pub input_path: StoragePath,
}

/// Creates job records and hands them to the worker pool. Submission
/// returns as soon as the job is queued; it never waits on a conversion.
pub struct Dispatcher {
    registry: Arc<dyn JobRegistry>,
    sender: mpsc::Sender<ConversionRequest>,
}

impl Dispatcher {
    pub fn new(registry: Arc<dyn JobRegistry>, sender: mpsc::Sender<ConversionRequest>) -> Self {
        Self { registry, sender }
    }

    /// Registers the job as pending and enqueues it. When the queue is
    /// full this awaits capacity; the conversion itself is never awaited.
    pub async fn submit(
        &self,
        id: JobId,
        original_filename: SourceFilename,
        input_path: StoragePath,
    ) -> Result<Job, SubmitError> {
        let job = Job::new(id, original_filename);
        self.registry.create(&job).await?;

        let request = ConversionRequest {
            job_id: job.id,
            input_path,
        };

        if self.sender.send(request).await.is_err() {
            // Worker pool is gone; remove the record so the caller sees a
            // clean failure instead of a job that can never progress.
            if let Err(e) = self.registry.delete(job.id).await {
                tracing::warn!(error = %e, job_id = %job.id, "Failed to roll back job after queue closure");
            }
            return Err(SubmitError::QueueClosed);
        }

        tracing::info!(
            job_id = %job.id,
            filename = %job.original_filename,
            "Conversion job enqueued"
        );

        Ok(job)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("conversion queue is closed")]
    QueueClosed,
}
