use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{ConversionEngine, EngineError};
use crate::domain::TARGET_EXTENSION;

/// Engine adapter that shells out to an external converter. The output
/// directory and the input path are appended to the configured arguments,
/// in that order, so a LibreOffice-style invocation reads
/// `soffice --headless --convert-to docx --outdir <dir> <input>`.
pub struct CommandConversionEngine {
    program: String,
    args: Vec<String>,
}

impl CommandConversionEngine {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

#[async_trait]
impl ConversionEngine for CommandConversionEngine {
    async fn convert(&self, input: &Path, output_dir: &Path) -> Result<String, EngineError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(output_dir)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The worker's timeout cancels this future; kill_on_drop makes
            // sure the child does not outlive it.
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, input = %input.display(), "Starting converter process");

        let output = cmd
            .output()
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Failed(format!(
                "converter exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // The directory is exclusive to this job, so the produced document
        // is whatever single file with the target extension landed in it.
        let suffix = format!(".{}", TARGET_EXTENSION);
        let mut entries = tokio::fs::read_dir(output_dir)
            .await
            .map_err(|e| EngineError::Failed(e.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| EngineError::Failed(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(&suffix) {
                return Ok(name);
            }
        }

        Err(EngineError::MissingArtifact)
    }
}
