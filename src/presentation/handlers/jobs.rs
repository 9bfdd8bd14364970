use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::RegistryError;
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobSummary {
    pub id: String,
    pub status: String,
    pub message: Option<String>,
    pub original_filename: String,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Operational surface: a snapshot of every known job.
#[tracing::instrument(skip(state))]
pub async fn list_jobs_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.list().await {
        Ok(jobs) => {
            let jobs = jobs
                .into_iter()
                .map(|job| JobSummary {
                    id: job.id.to_string(),
                    status: job.status.as_str().to_string(),
                    message: job.message,
                    original_filename: job.original_filename.to_string(),
                    created_at: job.created_at.to_rfc3339(),
                })
                .collect();
            (StatusCode::OK, Json(JobListResponse { jobs })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list jobs");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list jobs: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// Removes the record and best-effort deletes its artifact. Does not
/// interrupt a conversion already in flight.
#[tracing::instrument(skip(state))]
pub async fn delete_job_handler(
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

    let removed = match state.registry.delete(JobId::from_uuid(uuid)).await {
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
            tracing::error!(error = %e, "Failed to delete job");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to delete job: {}", e),
                }),
            )
                .into_response();
        }
    };

    if let Some(artifact_path) = removed.artifact_path() {
        if let Err(e) = state.artifact_store.remove(&artifact_path).await {
            tracing::warn!(error = %e, path = %artifact_path, "Failed to delete artifact for removed job");
        }
    }

    tracing::info!("Job removed");

    (
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Job removed".to_string(),
        }),
    )
        .into_response()
}
