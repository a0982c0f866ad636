//! Final Assessment Extraction
//!
//! On the final turn the LLM is asked to return a JSON assessment object.
//! The model is under no obligation to comply, so extraction is best-effort
//! and total: fence markers and surrounding prose are tolerated, and any
//! output that cannot be decoded yields a canned, well-shaped fallback.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One concrete correction offered to the learner.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImprovementTip {
    pub what_they_said: String,
    pub better_way: String,
    pub explanation: String,
}

/// The structured scoring/feedback object produced once per session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Assessment {
    pub score: u8,
    pub stars: u8,
    pub message: String,
    pub what_you_did_well: String,
    pub improvement_tip: ImprovementTip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_feedback: Option<String>,
}

impl Assessment {
    /// Canned assessment returned when the model's output could not be
    /// decoded into the expected shape.
    pub fn parse_fallback() -> Self {
        Self {
            score: 85,
            stars: 4,
            message: "Great job! You completed the practice session.".to_string(),
            what_you_did_well:
                "You engaged well in the conversation and showed good understanding of the topic."
                    .to_string(),
            improvement_tip: ImprovementTip {
                what_they_said: "Your responses".to_string(),
                better_way: "More natural phrasing with complete sentences".to_string(),
                explanation: "Practice using full, polite sentences in conversation".to_string(),
            },
            detailed_feedback: None,
        }
    }

    /// Canned assessment returned when the assessment call itself failed.
    pub fn call_failure_fallback() -> Self {
        Self {
            score: 80,
            stars: 4,
            message: "Well done! You completed the practice session.".to_string(),
            what_you_did_well: "You participated actively and showed effort in practicing."
                .to_string(),
            improvement_tip: ImprovementTip {
                what_they_said: "Your conversation".to_string(),
                better_way: "More detailed responses".to_string(),
                explanation: "Try to elaborate more on your answers".to_string(),
            },
            detailed_feedback: None,
        }
    }

    fn clamp_ranges(mut self) -> Self {
        self.score = self.score.min(100);
        self.stars = self.stars.clamp(1, 5);
        self
    }
}

/// Raw decode target: scores may arrive as floats or out of range, so they
/// are taken wide and narrowed after decoding.
#[derive(Deserialize)]
struct RawAssessment {
    score: f64,
    stars: f64,
    message: String,
    what_you_did_well: String,
    improvement_tip: ImprovementTip,
    #[serde(default)]
    detailed_feedback: Option<String>,
}

/// Extracts an `Assessment` from free-form model output.
///
/// Never fails: strips code fences, slices the outermost brace pair, decodes,
/// and falls back to [`Assessment::parse_fallback`] on any mismatch. Score
/// and star values are clamped into their documented ranges.
pub fn parse_assessment(raw: &str) -> Assessment {
    let cleaned = strip_code_fences(raw);

    let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => {
            warn!("assessment output contained no JSON object, using fallback");
            return Assessment::parse_fallback();
        }
    };

    match serde_json::from_str::<RawAssessment>(candidate) {
        Ok(raw) => Assessment {
            score: raw.score.round().clamp(0.0, 255.0) as u8,
            stars: raw.stars.round().clamp(0.0, 255.0) as u8,
            message: raw.message,
            what_you_did_well: raw.what_you_did_well,
            improvement_tip: raw.improvement_tip,
            detailed_feedback: raw.detailed_feedback,
        }
        .clamp_ranges(),
        Err(err) => {
            warn!(error = %err, "failed to decode assessment JSON, using fallback");
            Assessment::parse_fallback()
        }
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    for marker in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(marker) {
            text = stripped.trim_start();
            break;
        }
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped.trim_end();
    }
    text
}
