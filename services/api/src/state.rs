//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the session
//! registry, the conversation engine, and the collaborator clients shared
//! by all request handlers.

use crate::config::Config;
use bolo_core::{
    engine::ConversationEngine,
    llm::LlmClient,
    registry::SessionRegistry,
    speech::{SpeechToText, TextToSpeech},
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub engine: Arc<ConversationEngine>,
    pub llm: Arc<dyn LlmClient>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub config: Arc<Config>,
}
