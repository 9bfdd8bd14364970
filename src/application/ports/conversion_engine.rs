use std::path::Path;

use async_trait::async_trait;

/// External collaborator that performs the actual format conversion. Calls
/// are long-running (tens of seconds to minutes) and may fail transiently
/// or permanently; the caller bounds them with a timeout and never retries.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Converts `input` and writes the artifact into `output_dir`, which is
    /// exclusive to this job. Returns the produced artifact's file name.
    async fn convert(&self, input: &Path, output_dir: &Path) -> Result<String, EngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("conversion failed: {0}")]
    Failed(String),
    #[error("engine unavailable: {0}")]
    Unavailable(String),
    #[error("engine reported success but produced no artifact")]
    MissingArtifact,
}
