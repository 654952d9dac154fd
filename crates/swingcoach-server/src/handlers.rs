use crate::conversation::DEFAULT_SESSION;
use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use swingcoach_core::SwingSummary;
use swingcoach_llm::{compose_feedback, ChatTurn};
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

pub const NO_VIDEO: &str = "No video file provided.";
pub const NO_MESSAGE: &str = "No message provided.";

/// Body-limit overruns keep their 413; anything else is a malformed upload
fn upload_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

fn session_or_default(session_id: Option<String>) -> String {
    session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION.to_string())
}

/// POST /analyze - Analyze an uploaded swing video and return coaching feedback
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    // a body that is not multipart cannot carry the video field
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest(NO_VIDEO.into()))?;

    let mut video: Option<Bytes> = None;
    let mut session_id: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("video") => {
                let bytes = field.bytes().await.map_err(upload_error)?;
                if !bytes.is_empty() {
                    video = Some(bytes);
                }
            }
            Some("sessionId") => {
                session_id = Some(field.text().await.map_err(upload_error)?);
            }
            _ => {}
        }
    }

    let Some(video) = video else {
        return Err(ApiError::BadRequest(NO_VIDEO.into()));
    };
    let session = session_or_default(session_id);
    tracing::info!(bytes = video.len(), %session, "analyzing uploaded swing");

    let summary = run_analysis(&state, video).await?;
    let feedback = compose_feedback(state.llm.as_ref(), &summary).await?;
    state
        .conversations
        .append(&session, [ChatTurn::assistant(feedback.clone())]);

    Ok(Json(AnalyzeResponse {
        initial_message: feedback.clone(),
        analysis: feedback,
        metrics: summary,
        session_id: session,
    }))
}

/// Stage the upload and run the blocking pipeline on a bounded worker slot.
///
/// The token is cancelled if the deadline passes or the request is dropped,
/// and the worker stops at its next frame.
async fn run_analysis(state: &AppState, video: Bytes) -> Result<SwingSummary, ApiError> {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let analyzer = Arc::clone(&state.analyzer);
    let scratch_dir = state.config.scratch_dir.clone();
    let slots = state.analysis_slots();

    let job = async move {
        let permit = slots
            .acquire_owned()
            .await
            .map_err(|_| ApiError::Internal("analysis pool closed".into()))?;

        let worker = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let staged = stage_upload(scratch_dir.as_deref(), &video)
                .map_err(|e| ApiError::Internal(format!("failed to stage upload: {}", e)))?;
            let summary = analyzer.analyze(staged.path(), &cancel)?;
            Ok::<_, ApiError>(summary)
        });

        worker
            .await
            .map_err(|e| ApiError::Internal(format!("analysis worker failed: {}", e)))?
    };

    match tokio::time::timeout(state.config.analysis_timeout, job).await {
        Ok(result) => {
            let _ = guard.disarm();
            result
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.config.analysis_timeout.as_secs(),
                "swing analysis timed out"
            );
            Err(ApiError::Timeout)
        }
    }
}

/// Write the upload to a temp file that is deleted when dropped
fn stage_upload(dir: Option<&Path>, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("swing-").suffix(".upload");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

/// POST /chat - Continue the coaching conversation
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let message = request.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ApiError::BadRequest(NO_MESSAGE.into()));
    }
    let session = session_or_default(request.session_id);

    let mut new_turns = request.chat_history.unwrap_or_default();
    new_turns.push(ChatTurn::user(message));

    let mut transcript = state.conversations.snapshot(&session);
    transcript.extend(new_turns.iter().cloned());
    tracing::info!(%session, turns = transcript.len(), "chat turn");

    let reply = state.llm.complete(&transcript).await?;

    let response = reply.content.clone();
    new_turns.push(reply);
    state.conversations.append(&session, new_turns);

    Ok(Json(ChatResponse {
        response,
        session_id: session,
    }))
}

/// GET /health - Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
