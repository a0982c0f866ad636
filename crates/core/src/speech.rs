//! Speech Collaborator Clients
//!
//! REST clients for the two speech services: recognition (speech-to-text)
//! and synthesis (text-to-speech). Both sit behind narrow traits so the
//! HTTP handlers and tests never depend on the concrete Google endpoints.

use crate::language::Language;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SPEECH_BASE_URL: &str = "https://speech.googleapis.com/v1p1beta1";
const TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";

/// Recognition result for one audio clip: the top alternative of the first
/// result, as the upstream service ranks them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcription {
    pub transcript: String,
    pub confidence: f32,
}

/// Speech recognition collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes a WEBM/Opus 48kHz clip. `Ok(None)` means the service
    /// returned no results (no speech detected), which is not an error.
    async fn recognize(&self, audio: &[u8], language: Language) -> Result<Option<Transcription>>;
}

/// Speech synthesis collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesizes `text` into an MP3 clip in the given language.
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>>;
}

/// Google Cloud Speech-to-Text client (`speech:recognize`).
pub struct GoogleSpeechClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleSpeechClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: SPEECH_BASE_URL.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: String,
    enable_automatic_punctuation: bool,
    model: &'static str,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    results: Option<Vec<RecognitionResult>>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Deserialize)]
struct RecognitionAlternative {
    transcript: String,
    #[serde(default)]
    confidence: f32,
}

#[async_trait]
impl SpeechToText for GoogleSpeechClient {
    async fn recognize(&self, audio: &[u8], language: Language) -> Result<Option<Transcription>> {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "WEBM_OPUS",
                sample_rate_hertz: 48_000,
                language_code: language.profile().stt_locale.to_string(),
                enable_automatic_punctuation: true,
                model: "latest_long",
            },
            audio: RecognitionAudio {
                content: BASE64_STANDARD.encode(audio),
            },
        };

        let url = format!("{}/speech:recognize?key={}", self.base_url, self.api_key);
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("speech recognition request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("speech recognition returned {status}: {body}"));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .context("failed to decode speech recognition response")?;

        let transcription = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|result| result.alternatives.into_iter().next())
            .map(|alt| Transcription {
                transcript: alt.transcript,
                confidence: alt.confidence,
            });

        Ok(transcription)
    }
}

/// Google Cloud Text-to-Speech client (`text:synthesize`).
pub struct GoogleTtsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleTtsClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: TTS_BASE_URL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[async_trait]
impl TextToSpeech for GoogleTtsClient {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: language.profile().tts_locale.to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let url = format!("{}/text:synthesize?key={}", self.base_url, self.api_key);
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("speech synthesis request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("speech synthesis returned {status}: {body}"));
        }

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .context("failed to decode speech synthesis response")?;

        BASE64_STANDARD
            .decode(parsed.audio_content)
            .context("synthesized audio was not valid base64")
    }
}
