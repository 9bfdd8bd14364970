mod convert;
mod download;
mod health;
mod job_status;
mod jobs;

pub use convert::convert_handler;
pub use download::download_handler;
pub use health::health_handler;
pub use job_status::job_status_handler;
pub use jobs::{delete_job_handler, list_jobs_handler};
