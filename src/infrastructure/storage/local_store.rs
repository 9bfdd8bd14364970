use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{FileStore, FileStoreError};
use crate::domain::StoragePath;

/// Filesystem-backed content area rooted at a base directory. Writes go
/// through a scoped temp file and a rename, so a path is only ever
/// published once its content is complete.
pub struct LocalFileStore {
    base: PathBuf,
}

impl LocalFileStore {
    pub fn new(base: PathBuf) -> Result<Self, FileStoreError> {
        std::fs::create_dir_all(&base).map_err(FileStoreError::Io)?;
        let base = base.canonicalize().map_err(FileStoreError::Io)?;
        Ok(Self { base })
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, FileStoreError> {
        let target = self.resolve(path);
        let parent = target
            .parent()
            .ok_or_else(|| FileStoreError::WriteFailed(format!("invalid target: {}", path)))?;
        tokio::fs::create_dir_all(parent).await?;

        // Temp file in the same directory keeps the rename atomic and
        // cleans itself up if the stream errors out.
        let tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(FileStoreError::Io)?
            .into_temp_path();

        let mut file = tokio::fs::File::create(&tmp).await?;
        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(FileStoreError::Io)?;
            total_bytes += bytes.len() as u64;
            file.write_all(&bytes).await?;
        }

        file.sync_all().await?;
        drop(file);

        tmp.persist(&target)
            .map_err(|e| FileStoreError::WriteFailed(e.to_string()))?;

        Ok(total_bytes)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, FileStoreError> {
        let target = self.resolve(path);
        tokio::fs::read(&target).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FileStoreError::NotFound(path.to_string())
            } else {
                FileStoreError::ReadFailed(e.to_string())
            }
        })
    }

    async fn remove(&self, path: &StoragePath) -> Result<(), FileStoreError> {
        let target = self.resolve(path);
        tokio::fs::remove_file(&target).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FileStoreError::NotFound(path.to_string())
            } else {
                FileStoreError::DeleteFailed(e.to_string())
            }
        })
    }

    async fn head(&self, path: &StoragePath) -> Result<u64, FileStoreError> {
        let target = self.resolve(path);
        let meta = tokio::fs::metadata(&target).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FileStoreError::NotFound(path.to_string())
            } else {
                FileStoreError::ReadFailed(e.to_string())
            }
        })?;
        Ok(meta.len())
    }

    fn resolve(&self, path: &StoragePath) -> PathBuf {
        self.base.join(path.as_str())
    }
}
