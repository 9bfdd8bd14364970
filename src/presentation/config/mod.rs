mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    EngineSettings, LoggingSettings, ServerSettings, Settings, StorageSettings, WorkerSettings,
};
