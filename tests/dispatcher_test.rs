use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use tokio::sync::mpsc;

use docrelay::application::ports::{
    ConversionEngine, EngineError, FileStore, JobRegistry, RegistryError,
};
use docrelay::application::services::{ConversionWorker, Dispatcher, SubmitError};
use docrelay::domain::{JobId, JobStatus, SourceFilename, StoragePath};
use docrelay::infrastructure::registry::InMemoryJobRegistry;
use docrelay::infrastructure::storage::LocalFileStore;

struct CopyingEngine;

#[async_trait]
impl ConversionEngine for CopyingEngine {
    async fn convert(&self, input: &Path, output_dir: &Path) -> Result<String, EngineError> {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let artifact = format!("{}.docx", stem);
        let data = tokio::fs::read(input)
            .await
            .map_err(|e| EngineError::Failed(e.to_string()))?;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        tokio::fs::write(output_dir.join(&artifact), data)
            .await
            .map_err(|e| EngineError::Failed(e.to_string()))?;
        Ok(artifact)
    }
}

struct RefusingEngine;

#[async_trait]
impl ConversionEngine for RefusingEngine {
    async fn convert(&self, _input: &Path, _output_dir: &Path) -> Result<String, EngineError> {
        Err(EngineError::Failed("malformed input".to_string()))
    }
}

struct Pipeline {
    registry: Arc<dyn JobRegistry>,
    staging_store: Arc<dyn FileStore>,
    dispatcher: Dispatcher,
    _staging_dir: tempfile::TempDir,
    _artifacts_dir: tempfile::TempDir,
}

fn create_pipeline(engine: Arc<dyn ConversionEngine>) -> Pipeline {
    let staging_dir = tempfile::TempDir::new().unwrap();
    let artifacts_dir = tempfile::TempDir::new().unwrap();

    let registry: Arc<dyn JobRegistry> = Arc::new(InMemoryJobRegistry::new());
    let staging_store: Arc<dyn FileStore> =
        Arc::new(LocalFileStore::new(staging_dir.path().to_path_buf()).unwrap());
    let artifact_store: Arc<dyn FileStore> =
        Arc::new(LocalFileStore::new(artifacts_dir.path().to_path_buf()).unwrap());

    let (sender, receiver) = mpsc::channel(8);
    let worker = ConversionWorker::new(
        receiver,
        Arc::clone(&registry),
        Arc::clone(&staging_store),
        artifact_store,
        engine,
        Duration::from_secs(5),
        2,
    );
    tokio::spawn(worker.run());

    let dispatcher = Dispatcher::new(Arc::clone(&registry), sender);

    Pipeline {
        registry,
        staging_store,
        dispatcher,
        _staging_dir: staging_dir,
        _artifacts_dir: artifacts_dir,
    }
}

async fn stage_input(pipeline: &Pipeline, job_id: &JobId) -> StoragePath {
    let path = StoragePath::staged_source(job_id);
    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("%PDF-1.4 fake"))]));
    pipeline.staging_store.save(&path, byte_stream).await.unwrap();
    path
}

async fn wait_for_terminal(pipeline: &Pipeline, id: JobId) -> docrelay::domain::Job {
    for _ in 0..250 {
        let job = pipeline.registry.get(id).await.unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job did not reach a terminal state in time");
}

#[tokio::test]
async fn given_submission_when_returning_then_job_is_pending() {
    let pipeline = create_pipeline(Arc::new(CopyingEngine));
    let job_id = JobId::new();
    let staged = stage_input(&pipeline, &job_id).await;

    let job = pipeline
        .dispatcher
        .submit(
            job_id,
            SourceFilename::parse("report.pdf").unwrap(),
            staged,
        )
        .await
        .unwrap();

    assert_eq!(job.id, job_id);
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn given_submitted_job_when_worker_finishes_then_completed_with_artifact() {
    let pipeline = create_pipeline(Arc::new(CopyingEngine));
    let job_id = JobId::new();
    let staged = stage_input(&pipeline, &job_id).await;

    pipeline
        .dispatcher
        .submit(
            job_id,
            SourceFilename::parse("report.pdf").unwrap(),
            staged.clone(),
        )
        .await
        .unwrap();

    let job = wait_for_terminal(&pipeline, job_id).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.artifact_name.is_some());

    // Cleanup guarantee: staged input gone after the terminal state.
    assert!(pipeline.staging_store.head(&staged).await.is_err());
}

#[tokio::test]
async fn given_refusing_engine_when_worker_finishes_then_error_and_input_removed() {
    let pipeline = create_pipeline(Arc::new(RefusingEngine));
    let job_id = JobId::new();
    let staged = stage_input(&pipeline, &job_id).await;

    pipeline
        .dispatcher
        .submit(
            job_id,
            SourceFilename::parse("report.pdf").unwrap(),
            staged.clone(),
        )
        .await
        .unwrap();

    let job = wait_for_terminal(&pipeline, job_id).await;
    assert_eq!(job.status, JobStatus::Error);
    assert!(job.message.unwrap().contains("malformed input"));
    assert!(job.artifact_name.is_none());
    assert!(pipeline.staging_store.head(&staged).await.is_err());
}

#[tokio::test]
async fn given_duplicate_id_when_submitting_then_registry_error() {
    let pipeline = create_pipeline(Arc::new(CopyingEngine));
    let job_id = JobId::new();
    let staged = stage_input(&pipeline, &job_id).await;

    pipeline
        .dispatcher
        .submit(
            job_id,
            SourceFilename::parse("first.pdf").unwrap(),
            staged.clone(),
        )
        .await
        .unwrap();

    let result = pipeline
        .dispatcher
        .submit(
            job_id,
            SourceFilename::parse("second.pdf").unwrap(),
            staged,
        )
        .await;

    assert!(matches!(
        result,
        Err(SubmitError::Registry(RegistryError::DuplicateId(_)))
    ));
}

#[tokio::test]
async fn given_closed_queue_when_submitting_then_no_record_is_left_behind() {
    let registry: Arc<dyn JobRegistry> = Arc::new(InMemoryJobRegistry::new());
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);

    let dispatcher = Dispatcher::new(Arc::clone(&registry), sender);
    let job_id = JobId::new();

    let result = dispatcher
        .submit(
            job_id,
            SourceFilename::parse("report.pdf").unwrap(),
            StoragePath::staged_source(&job_id),
        )
        .await;

    assert!(matches!(result, Err(SubmitError::QueueClosed)));
    assert!(matches!(
        registry.get(job_id).await,
        Err(RegistryError::NotFound(_))
    ));
}
