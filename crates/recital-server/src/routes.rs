use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use recital_jobs::{JobStatus, SubmitRequest};
use uuid::Uuid;

use crate::{
    error::ApiError,
    request::ExtractPayload,
    state::AppState,
    types::{
        ConvertRequest, ConvertResponse, DeleteResponse, HistoryItem, HistoryQuery,
        HistoryResponse, StatusResponse, VoicesResponse, download_url,
    },
};

/// All conversion endpoints
pub fn endpoint_router() -> Router<AppState> {
    Router::new()
        .route("/voices", get(voices))
        .route("/convert", post(convert))
        .route("/status/{id}", get(status))
        .route("/download/{id}", get(download))
        .route("/history", get(history))
        .route("/history/{id}", delete(delete_history))
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (http::StatusCode::OK, "ok")
}

async fn voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.registry.iter().cloned().collect(),
        default_voice: state.registry.default_voice().id.clone(),
    })
}

/// Accept a conversion request
///
/// Small inputs complete within the request; larger ones return a
/// pending job for polling. The split is a latency choice, both paths
/// run the same state machine.
async fn convert(
    State(state): State<AppState>,
    ExtractPayload(request): ExtractPayload<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let submit = SubmitRequest {
        markdown: request.markdown_text,
        title: request.title,
        voice_id: request.voice_id,
    };

    let inline = submit.markdown.len() <= state.inline_threshold_chars;
    let job = if inline {
        state.manager.submit(submit).await?
    } else {
        state.manager.submit_detached(submit).await?
    };

    tracing::debug!(job = %job.id, status = %job.status, inline, "conversion request handled");

    let message = match job.status {
        JobStatus::Completed => "Conversion successful",
        JobStatus::Failed => "Conversion failed",
        JobStatus::Pending | JobStatus::Processing => "Conversion accepted",
    };

    let download = (job.status == JobStatus::Completed).then(|| download_url(job.id));

    Ok(Json(ConvertResponse {
        conversion_id: job.id,
        status: job.status,
        message: message.to_string(),
        download_url: download,
    }))
}

async fn status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    let job = state.manager.get_status(id).await?;

    let download = (job.status == JobStatus::Completed).then(|| download_url(job.id));

    Ok(Json(StatusResponse {
        conversion_id: job.id,
        status: job.status,
        voice_id: job.voice_id,
        file_size: job.file_size,
        download_url: download,
        error: job.error,
    }))
}

async fn download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let audio = state.manager.get_audio(id).await?;

    let stream = tokio_util::io::ReaderStream::new(audio.file);
    let body = axum::body::Body::from_stream(stream);

    let response = Response::builder()
        .header(http::header::CONTENT_TYPE, audio.content_type)
        .header(http::header::CONTENT_LENGTH, audio.size)
        .header(
            http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", audio.filename),
        )
        .body(body)
        .unwrap_or_else(|_| {
            Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::empty())
                .expect("empty response must build")
        });

    Ok(response)
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query.limit.min(state.page_limit_max);

    let items = state
        .manager
        .history()
        .list(limit, query.offset)
        .await?
        .into_iter()
        .map(HistoryItem::from)
        .collect();

    Ok(Json(HistoryResponse { items }))
}

async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.manager.delete(id).await?;

    Ok(Json(DeleteResponse {
        message: "Conversion deleted successfully".to_string(),
    }))
}
