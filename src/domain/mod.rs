mod job;
mod job_id;
mod job_status;
mod source_filename;
mod storage_path;

pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use source_filename::{FilenameError, SourceFilename, SOURCE_EXTENSION, TARGET_EXTENSION};
pub use storage_path::StoragePath;
