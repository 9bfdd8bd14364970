use std::io;

use bytes::Bytes;
use futures::stream;

use docrelay::application::ports::{FileStore, FileStoreError};
use docrelay::domain::{JobId, StoragePath};
use docrelay::infrastructure::storage::LocalFileStore;

fn create_test_store() -> (tempfile::TempDir, LocalFileStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalFileStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_valid_stream_when_saving_then_file_is_persisted() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::staged_source(&JobId::new());

    let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
    let byte_stream = Box::pin(stream::iter(chunks));

    let size = store.save(&path, byte_stream).await.unwrap();
    assert_eq!(size, 11);
}

#[tokio::test]
async fn given_saved_file_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::staged_source(&JobId::new());

    let content = b"test content";
    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from(&content[..]))]));
    store.save(&path, byte_stream).await.unwrap();

    let fetched = store.fetch(&path).await.unwrap();
    assert_eq!(fetched, content);
}

#[tokio::test]
async fn given_saved_file_when_removing_then_fetch_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::staged_source(&JobId::new());

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.save(&path, byte_stream).await.unwrap();

    store.remove(&path).await.unwrap();

    assert!(matches!(
        store.fetch(&path).await,
        Err(FileStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_stream_error_when_saving_then_no_file_is_published() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::staged_source(&JobId::new());

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "network drop",
        )),
    ];
    let byte_stream = Box::pin(stream::iter(chunks));

    let result = store.save(&path, byte_stream).await;
    assert!(result.is_err());

    // The half-written temp file must never appear at the target path.
    assert!(matches!(
        store.head(&path).await,
        Err(FileStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_nonexistent_path_when_fetching_then_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::staged_source(&JobId::new());

    assert!(matches!(
        store.fetch(&path).await,
        Err(FileStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_saved_file_when_head_then_returns_size() {
    let (_dir, store) = create_test_store();
    let path = StoragePath::staged_source(&JobId::new());

    let content = b"hello world";
    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from(&content[..]))]));
    store.save(&path, byte_stream).await.unwrap();

    let size = store.head(&path).await.unwrap();
    assert_eq!(size, 11);
}

#[tokio::test]
async fn given_artifact_path_when_saving_then_job_directory_is_created() {
    let (dir, store) = create_test_store();
    let job_id = JobId::new();
    let path = StoragePath::artifact(&job_id, "out.docx");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("docx bytes"))]));
    store.save(&path, byte_stream).await.unwrap();

    let on_disk = dir
        .path()
        .join(job_id.as_uuid().to_string())
        .join("out.docx");
    assert!(on_disk.exists());
}

#[tokio::test]
async fn given_storage_path_when_resolving_then_absolute_path_is_under_base() {
    let (dir, store) = create_test_store();
    let path = StoragePath::from_raw("abc.pdf");

    let resolved = store.resolve(&path);

    assert!(resolved.is_absolute());
    assert!(resolved.starts_with(dir.path().canonicalize().unwrap()));
    assert!(resolved.ends_with("abc.pdf"));
}
