use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tracing::Instrument;

use crate::application::ports::{ConversionEngine, FileStore, JobRegistry, RegistryError};
use crate::domain::{Job, JobId, JobStatus, StoragePath};

use super::dispatcher::ConversionRequest;

/// Background pool that drains the conversion queue. Each job runs in its
/// own task; a semaphore caps how many conversions are live at once.
pub struct ConversionWorker {
    receiver: mpsc::Receiver<ConversionRequest>,
    context: Arc<WorkerContext>,
    concurrency: usize,
}

struct WorkerContext {
    registry: Arc<dyn JobRegistry>,
    staging_store: Arc<dyn FileStore>,
    artifact_store: Arc<dyn FileStore>,
    engine: Arc<dyn ConversionEngine>,
    engine_timeout: Duration,
}

impl ConversionWorker {
    pub fn new(
        receiver: mpsc::Receiver<ConversionRequest>,
        registry: Arc<dyn JobRegistry>,
        staging_store: Arc<dyn FileStore>,
        artifact_store: Arc<dyn FileStore>,
        engine: Arc<dyn ConversionEngine>,
        engine_timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            receiver,
            context: Arc::new(WorkerContext {
                registry,
                staging_store,
                artifact_store,
                engine,
                engine_timeout,
            }),
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(concurrency = self.concurrency, "Conversion worker pool started");
        let slots = Arc::new(Semaphore::new(self.concurrency));

        while let Some(request) = self.receiver.recv().await {
            let permit = match Arc::clone(&slots).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let context = Arc::clone(&self.context);
            let span = tracing::info_span!("conversion_job", job_id = %request.job_id);
            tokio::spawn(
                async move {
                    if let Err(e) = context.process_job(request).await {
                        tracing::error!(error = %e, "Conversion job failed");
                    }
                    drop(permit);
                }
                .instrument(span),
            );
        }

        tracing::info!("Conversion worker pool stopped: channel closed");
    }
}

impl WorkerContext {
    async fn process_job(&self, request: ConversionRequest) -> Result<(), WorkerError> {
        let job_id = request.job_id;

        let claimed = self
            .update_status(
                job_id,
                JobStatus::Processing,
                Some("Converting document to Word"),
                None,
            )
            .await?;
        if claimed.is_none() {
            // Deleted before a worker picked it up; the staged input still
            // has to go.
            self.discard_input(&request).await;
            return Ok(());
        }

        let outcome = self.run_engine(&request).await;

        // The original is deleted exactly once, whatever the engine did.
        self.discard_input(&request).await;

        match outcome {
            Ok(artifact_name) => {
                tracing::info!(artifact = %artifact_name, "Conversion completed");
                self.update_status(
                    job_id,
                    JobStatus::Completed,
                    Some("Conversion finished"),
                    Some(&artifact_name),
                )
                .await?;
            }
            Err(message) => {
                tracing::warn!(reason = %message, "Conversion failed");
                self.update_status(job_id, JobStatus::Error, Some(&message), None)
                    .await?;
            }
        }

        Ok(())
    }

    /// Runs the engine under the configured timeout. Failures come back as
    /// the human-readable message recorded on the job; they never propagate
    /// out of the worker.
    async fn run_engine(&self, request: &ConversionRequest) -> Result<String, String> {
        let input = self.staging_store.resolve(&request.input_path);
        let output_dir = self
            .artifact_store
            .resolve(&StoragePath::artifact_scope(&request.job_id));

        match tokio::time::timeout(self.engine_timeout, self.engine.convert(&input, &output_dir))
            .await
        {
            Ok(Ok(artifact_name)) => Ok(artifact_name),
            Ok(Err(e)) => Err(format!("Conversion failed: {}", e)),
            Err(_) => Err(format!(
                "Conversion timed out after {}s",
                self.engine_timeout.as_secs()
            )),
        }
    }

    async fn discard_input(&self, request: &ConversionRequest) {
        if let Err(e) = self.staging_store.remove(&request.input_path).await {
            tracing::warn!(
                error = %e,
                path = %request.input_path,
                "Failed to delete staged input after conversion"
            );
        }
    }

    /// `Ok(None)` means the job vanished from the registry (deleted by a
    /// caller while we held it); the worker tolerates that and moves on.
    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        message: Option<&str>,
        artifact_name: Option<&str>,
    ) -> Result<Option<Job>, WorkerError> {
        tracing::debug!(status = %status, "Job status transition");
        match self
            .registry
            .transition(job_id, status, message, artifact_name)
            .await
        {
            Ok(job) => Ok(Some(job)),
            Err(RegistryError::NotFound(_)) => {
                tracing::debug!("Job deleted while conversion was in flight");
                Ok(None)
            }
            Err(e) => Err(WorkerError::Registry(e)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}
