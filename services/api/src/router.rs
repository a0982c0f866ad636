//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, the bundled test client, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        EndSessionPayload, ErrorResponse, SendMessagePayload, SendMessageResponse,
        StartSessionPayload, StartSessionResponse, StatusResponse, TestLlmResponse,
        TranscribeAudioPayload, TranscribeAudioResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home,
        handlers::health,
        handlers::test_page,
        handlers::test_llm,
        handlers::start_session,
        handlers::transcribe_audio,
        handlers::send_message,
        handlers::end_session,
    ),
    components(
        schemas(
            StartSessionPayload,
            StartSessionResponse,
            TranscribeAudioPayload,
            TranscribeAudioResponse,
            SendMessagePayload,
            SendMessageResponse,
            EndSessionPayload,
            StatusResponse,
            TestLlmResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Language Practice API", description = "Turn-limited spoken-language practice sessions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/test", get(handlers::test_page))
        .route("/test_llm", get(handlers::test_llm))
        // Alias kept for clients written against the original route name.
        .route("/test_gemini", get(handlers::test_llm))
        .route("/start_session", post(handlers::start_session))
        .route("/transcribe_audio", post(handlers::transcribe_audio))
        .route("/send_message", post(handlers::send_message))
        .route("/end_session", post(handlers::end_session))
        .with_state(app_state);

    // Merge the stateful routes with the stateless Swagger UI.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
