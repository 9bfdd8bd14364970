use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    convert_handler, delete_job_handler, download_handler, health_handler, job_status_handler,
    list_jobs_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let upload_limit = DefaultBodyLimit::max(state.upload_limit_bytes);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/convert", post(convert_handler))
        .route("/api/v1/jobs", get(list_jobs_handler))
        .route(
            "/api/v1/jobs/{job_id}",
            get(job_status_handler).delete(delete_job_handler),
        )
        .route("/api/v1/jobs/{job_id}/download", get(download_handler))
        .layer(upload_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
