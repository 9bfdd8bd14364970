use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// A content area on disk. The service runs two instances: one for staged
/// originals and one for produced artifacts.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes the streamed content durably. The file must never be visible
    /// at `path` in a partially written state.
    async fn save(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, FileStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, FileStoreError>;

    async fn remove(&self, path: &StoragePath) -> Result<(), FileStoreError>;

    async fn head(&self, path: &StoragePath) -> Result<u64, FileStoreError>;

    /// Absolute filesystem location of `path`, for handing to external
    /// tools that work on OS paths.
    fn resolve(&self, path: &StoragePath) -> PathBuf;
}

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
