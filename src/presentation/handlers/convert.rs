use std::io;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use futures::stream;
use serde::Serialize;

use crate::application::services::SubmitError;
use crate::domain::{JobId, SourceFilename, StoragePath};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ConvertResponse {
    pub id: String,
    pub status: String,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn convert_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Convert request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let raw_filename = field.file_name().unwrap_or_default().to_string();

    // Validation happens before any job or file exists; a bad name costs
    // the caller nothing but this response.
    let filename = match SourceFilename::parse(raw_filename) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected upload");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

    let job_id = JobId::new();
    let staged = StoragePath::staged_source(&job_id);

    let byte_stream = Box::pin(stream::iter(vec![Ok::<Bytes, io::Error>(data)]));
    if let Err(e) = state.staging_store.save(&staged, byte_stream).await {
        tracing::error!(error = %e, "Failed to stage upload");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store upload: {}", e),
            }),
        )
            .into_response();
    }

    let job = match state.dispatcher.submit(job_id, filename, staged.clone()).await {
        Ok(job) => job,
        Err(e) => {
            // The job never made it into the pipeline; drop the staged file.
            if let Err(del_err) = state.staging_store.remove(&staged).await {
                tracing::warn!(error = %del_err, "Failed to delete staged file after rejected submission");
            }
            let status = match e {
                SubmitError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
                SubmitError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::error!(error = %e, "Failed to submit conversion job");
            return (
                status,
                Json(ErrorResponse {
                    error: format!("Failed to submit job: {}", e),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::ACCEPTED,
        Json(ConvertResponse {
            id: job.id.to_string(),
            status: job.status.as_str().to_string(),
            message: job.message,
        }),
    )
        .into_response()
}
