//! API Models
//!
//! Request and response bodies for the HTTP surface, annotated for OpenAPI
//! generation with `utoipa`. The wire shapes match what the bundled browser
//! client and the mobile app consume.

use bolo_core::session::TurnResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema, Debug)]
pub struct StartSessionPayload {
    #[schema(example = "practice-42")]
    pub session_id: String,
    #[schema(example = "Ordering at a Café")]
    pub topic: Option<String>,
    #[schema(example = "Basic café ordering phrases and polite requests")]
    pub lesson_content: Option<String>,
    #[schema(example = "hindi")]
    pub language: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct StartSessionResponse {
    pub status: String,
    pub session_id: String,
    pub initial_message: String,
    /// Base64-encoded MP3 of the greeting reply; null when synthesis failed.
    pub audio: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct TranscribeAudioPayload {
    /// Base64-encoded WEBM/Opus clip recorded at 48kHz.
    pub audio: String,
    #[schema(example = "english")]
    pub language: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct TranscribeAudioResponse {
    pub status: String,
    pub transcript: String,
    pub confidence: f32,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct SendMessagePayload {
    #[schema(example = "practice-42")]
    pub session_id: String,
    #[schema(example = "I would like a coffee, please")]
    pub message: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct SendMessageResponse {
    pub status: String,
    /// Either `{is_final: false, message}` or `{is_final: true, assessment}`.
    #[schema(value_type = Object)]
    pub response: TurnResult,
    /// Base64-encoded MP3 of the reply; only populated on non-final turns.
    pub audio: Option<String>,
    pub turn_count: u32,
    pub max_turns: u32,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct EndSessionPayload {
    #[schema(example = "practice-42")]
    pub session_id: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct StatusResponse {
    #[schema(example = "success")]
    pub status: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct TestLlmResponse {
    pub status: String,
    pub message: String,
}

/// Uniform error body: every handler failure surfaces in this shape.
#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    #[schema(example = "error")]
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
