mod conversion_engine;
mod file_store;
mod job_registry;
mod registry_error;

pub use conversion_engine::{ConversionEngine, EngineError};
pub use file_store::{FileStore, FileStoreError};
pub use job_registry::JobRegistry;
pub use registry_error::RegistryError;
