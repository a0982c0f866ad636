//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for the
//! practice-session lifecycle. It uses `utoipa` doc comments to generate
//! OpenAPI documentation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use bolo_core::language::Language;
use bolo_core::registry::SessionError;
use bolo_core::session::TurnResult;
use bolo_core::{DEFAULT_LESSON_CONTENT, DEFAULT_TOPIC, SESSION_GREETING};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    audio::{decode_audio_payload, encode_audio_payload},
    models::{
        EndSessionPayload, ErrorResponse, SendMessagePayload, SendMessageResponse,
        StartSessionPayload, StartSessionResponse, StatusResponse, TestLlmResponse,
        TranscribeAudioPayload, TranscribeAudioResponse,
    },
    state::AppState,
};

/// The bundled browser reference client.
const TEST_PAGE: &str = include_str!("../static/test.html");

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Upstream(anyhow::Error),
}

impl ApiError {
    /// Maps registry failures onto the matching HTTP shape.
    fn session(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SessionError::Duplicate(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Upstream(err) => {
                error!("Upstream collaborator error: {:?}", err);
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Upstream(err.into())
    }
}

/// Service descriptor listing the available routes.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service descriptor"))
)]
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "status": "running",
        "message": "Language Learning Chatbot API",
        "endpoints": {
            "GET /test": "Test interface",
            "POST /start_session": "Initialize a new conversation session",
            "POST /transcribe_audio": "Convert audio to text",
            "POST /send_message": "Send user message and get bot response",
            "POST /end_session": "End conversation session",
            "GET /health": "Health check"
        }
    }))
}

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = StatusResponse))
)]
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
    })
}

/// Serves the bundled browser reference client.
#[utoipa::path(
    get,
    path = "/test",
    responses((status = 200, description = "Browser test client"))
)]
pub async fn test_page() -> Html<&'static str> {
    Html(TEST_PAGE)
}

/// Diagnostic: sends a fixed prompt through the LLM collaborator.
#[utoipa::path(
    get,
    path = "/test_llm",
    responses(
        (status = 200, description = "LLM connectivity confirmed", body = TestLlmResponse),
        (status = 502, description = "LLM unreachable", body = ErrorResponse)
    )
)]
pub async fn test_llm(State(state): State<Arc<AppState>>) -> Result<Json<TestLlmResponse>, ApiError> {
    let message = state
        .llm
        .generate("Say 'Hello! The API is working.'")
        .await?;
    Ok(Json(TestLlmResponse {
        status: "success".to_string(),
        message,
    }))
}

/// Initializes a new conversation session and returns the opening reply.
#[utoipa::path(
    post,
    path = "/start_session",
    request_body = StartSessionPayload,
    responses(
        (status = 200, description = "Session started", body = StartSessionResponse),
        (status = 409, description = "Session id already in use", body = ErrorResponse),
        (status = 502, description = "LLM unreachable", body = ErrorResponse)
    )
)]
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StartSessionPayload>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let language = Language::parse(payload.language.as_deref().unwrap_or("english"));
    let topic = payload.topic.as_deref().unwrap_or(DEFAULT_TOPIC);
    let lesson_content = payload
        .lesson_content
        .as_deref()
        .unwrap_or(DEFAULT_LESSON_CONTENT);

    let handle = state
        .registry
        .create(&payload.session_id, topic, lesson_content, language)
        .await
        .map_err(ApiError::session)?;

    let result = {
        let mut session = handle.lock().await;
        state.engine.advance(&mut session, SESSION_GREETING).await
    };

    let result = match result {
        Ok(result) => result,
        Err(err) => {
            // A session that never produced its greeting is unusable.
            state.registry.remove(&payload.session_id).await;
            return Err(ApiError::Upstream(err));
        }
    };

    let initial_message = match result {
        TurnResult::Reply { message } => message,
        TurnResult::Final { .. } => {
            state.registry.remove(&payload.session_id).await;
            return Err(ApiError::Upstream(anyhow::anyhow!(
                "new session produced a final turn"
            )));
        }
    };

    let audio = synthesize_or_none(&state, &initial_message, language).await;

    Ok(Json(StartSessionResponse {
        status: "success".to_string(),
        session_id: payload.session_id,
        initial_message,
        audio,
    }))
}

/// Transcribes an uploaded audio clip.
#[utoipa::path(
    post,
    path = "/transcribe_audio",
    request_body = TranscribeAudioPayload,
    responses(
        (status = 200, description = "Transcript, or a no-speech error body", body = TranscribeAudioResponse),
        (status = 400, description = "Malformed audio payload", body = ErrorResponse),
        (status = 502, description = "Speech service unreachable", body = ErrorResponse)
    )
)]
pub async fn transcribe_audio(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranscribeAudioPayload>,
) -> Result<Response, ApiError> {
    let audio = decode_audio_payload(&payload.audio)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let language = Language::parse(payload.language.as_deref().unwrap_or("english"));

    match state.stt.recognize(&audio, language).await? {
        Some(transcription) => Ok(Json(TranscribeAudioResponse {
            status: "success".to_string(),
            transcript: transcription.transcript,
            confidence: transcription.confidence,
        })
        .into_response()),
        // The upstream call succeeded but heard nothing; the client treats
        // this as a prompt to re-record, not as a failure.
        None => Ok(Json(ErrorResponse::new("No speech detected")).into_response()),
    }
}

/// Processes one user message within a session.
#[utoipa::path(
    post,
    path = "/send_message",
    request_body = SendMessagePayload,
    responses(
        (status = 200, description = "Turn outcome", body = SendMessageResponse),
        (status = 404, description = "Unknown session id", body = ErrorResponse),
        (status = 409, description = "Session already completed", body = ErrorResponse),
        (status = 502, description = "LLM unreachable", body = ErrorResponse)
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let handle = state
        .registry
        .get(&payload.session_id)
        .await
        .map_err(ApiError::session)?;

    let mut session = handle.lock().await;
    if session.is_final() {
        return Err(ApiError::Conflict(format!(
            "Session '{}' has already completed its {} turns",
            payload.session_id,
            session.max_turns()
        )));
    }

    let result = state.engine.advance(&mut session, &payload.message).await?;

    let audio = match &result {
        TurnResult::Reply { message } => {
            synthesize_or_none(&state, message, session.language).await
        }
        TurnResult::Final { .. } => None,
    };

    Ok(Json(SendMessageResponse {
        status: "success".to_string(),
        response: result,
        audio,
        turn_count: session.turn_count(),
        max_turns: session.max_turns(),
    }))
}

/// Ends a session. Always succeeds, whether or not the session existed.
#[utoipa::path(
    post,
    path = "/end_session",
    request_body = EndSessionPayload,
    responses((status = 200, description = "Session removed", body = StatusResponse))
)]
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EndSessionPayload>,
) -> Json<StatusResponse> {
    state.registry.remove(&payload.session_id).await;
    Json(StatusResponse {
        status: "success".to_string(),
    })
}

/// Synthesizes a reply to base64 MP3, degrading to `None` on failure so a
/// TTS outage never fails the whole request.
async fn synthesize_or_none(
    state: &AppState,
    text: &str,
    language: Language,
) -> Option<String> {
    match state.tts.synthesize(text, language).await {
        Ok(bytes) => Some(encode_audio_payload(&bytes)),
        Err(err) => {
            warn!(error = %err, "speech synthesis failed, returning null audio");
            None
        }
    }
}
