use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use docrelay::application::ports::{ConversionEngine, FileStore, JobRegistry};
use docrelay::application::services::{ConversionWorker, Dispatcher};
use docrelay::infrastructure::engine::CommandConversionEngine;
use docrelay::infrastructure::observability::{init_tracing, TracingConfig};
use docrelay::infrastructure::registry::InMemoryJobRegistry;
use docrelay::infrastructure::storage::LocalFileStore;
use docrelay::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            level: settings.logging.level.clone(),
            json_format: settings.logging.enable_json,
        },
        settings.server.port,
    );

    let registry: Arc<dyn JobRegistry> = Arc::new(InMemoryJobRegistry::new());
    let staging_store: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(PathBuf::from(
        &settings.storage.staging_dir,
    ))?);
    let artifact_store: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(PathBuf::from(
        &settings.storage.artifacts_dir,
    ))?);
    let engine: Arc<dyn ConversionEngine> = Arc::new(CommandConversionEngine::new(
        settings.engine.program.clone(),
        settings.engine.args.clone(),
    ));

    let (sender, receiver) = mpsc::channel(settings.worker.queue_capacity);

    let worker = ConversionWorker::new(
        receiver,
        Arc::clone(&registry),
        Arc::clone(&staging_store),
        Arc::clone(&artifact_store),
        engine,
        Duration::from_secs(settings.engine.timeout_secs),
        settings.worker.concurrency,
    );
    tokio::spawn(worker.run());

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry), sender));

    let state = AppState {
        registry,
        staging_store,
        artifact_store,
        dispatcher,
        upload_limit_bytes: settings.server.max_upload_mb * 1024 * 1024,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
