use std::sync::Arc;

use crate::application::ports::{FileStore, JobRegistry};
use crate::application::services::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn JobRegistry>,
    pub staging_store: Arc<dyn FileStore>,
    pub artifact_store: Arc<dyn FileStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub upload_limit_bytes: usize,
}
