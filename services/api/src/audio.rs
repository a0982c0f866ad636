//! Audio Payload Framing
//!
//! Audio moves through the API as opaque base64 blobs: clients upload
//! WEBM/Opus recordings for transcription and receive MP3 synthesis back.
//! These helpers validate inbound payloads before any collaborator call.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

/// Upper bound on a decoded audio clip. Recognition is synchronous, so a
/// clip larger than this cannot be a legitimate short utterance.
pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AudioPayloadError {
    #[error("audio payload is not valid base64")]
    InvalidBase64,
    #[error("audio payload is empty")]
    Empty,
    #[error("audio payload exceeds {MAX_AUDIO_BYTES} bytes")]
    TooLarge,
}

/// Decodes and validates a base64 audio payload from a request body.
pub fn decode_audio_payload(encoded: &str) -> Result<Vec<u8>, AudioPayloadError> {
    let bytes = BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|_| AudioPayloadError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(AudioPayloadError::Empty);
    }
    if bytes.len() > MAX_AUDIO_BYTES {
        return Err(AudioPayloadError::TooLarge);
    }
    Ok(bytes)
}

/// Encodes synthesized audio for a response body.
pub fn encode_audio_payload(audio: &[u8]) -> String {
    BASE64_STANDARD.encode(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let clip = b"webm-opus-bytes".to_vec();
        let encoded = encode_audio_payload(&clip);
        assert_eq!(decode_audio_payload(&encoded).unwrap(), clip);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let encoded = format!("  {}\n", encode_audio_payload(b"clip"));
        assert_eq!(decode_audio_payload(&encoded).unwrap(), b"clip");
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert_eq!(
            decode_audio_payload("not base64!!!"),
            Err(AudioPayloadError::InvalidBase64)
        );
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert_eq!(decode_audio_payload(""), Err(AudioPayloadError::Empty));
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let oversized = vec![0u8; MAX_AUDIO_BYTES + 1];
        let encoded = encode_audio_payload(&oversized);
        assert_eq!(
            decode_audio_payload(&encoded),
            Err(AudioPayloadError::TooLarge)
        );
    }
}
