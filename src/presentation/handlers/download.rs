use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{FileStoreError, RegistryError};
use crate::domain::{JobId, JobStatus};
use crate::presentation::state::AppState;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    let job = match state.registry.get(JobId::from_uuid(uuid)).await {
        Ok(job) => job,
        Err(RegistryError::NotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job not found: {}", job_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job for download");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response();
        }
    };

    if job.status != JobStatus::Completed {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Conversion not finished. Status: {}", job.status),
            }),
        )
            .into_response();
    }

    let artifact_path = match job.artifact_path() {
        Some(path) => path,
        None => {
            // A completed job always carries an artifact name; a miss here
            // means the record was corrupted somewhere.
            tracing::error!("Completed job has no artifact name");
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Artifact not recorded".to_string(),
                }),
            )
                .into_response();
        }
    };

    let bytes = match state.artifact_store.fetch(&artifact_path).await {
        Ok(bytes) => bytes,
        Err(FileStoreError::NotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Artifact no longer in storage".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read artifact");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to read artifact: {}", e),
                }),
            )
                .into_response();
        }
    };

    let download_name = job.original_filename.download_name();
    tracing::info!(artifact = %artifact_path, filename = %download_name, "Serving artifact");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
