//! Supported Practice Languages
//!
//! This module defines the closed set of languages the tutor can run a
//! practice session in, along with the per-language configuration used to
//! instruct the LLM and to select locale codes for the speech services.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of languages a practice session can be held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Kannada,
    Tamil,
    Telugu,
    Malayalam,
    Bengali,
}

/// Static per-language configuration.
///
/// `response_instruction` and `aspects` are embedded verbatim into the system
/// prompt; `stt_locale` and `tts_locale` select voices/models on the speech
/// services (BCP-47 for recognition, two-letter codes for synthesis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageProfile {
    pub display_name: &'static str,
    pub response_instruction: &'static str,
    pub aspects: &'static str,
    pub stt_locale: &'static str,
    pub tts_locale: &'static str,
}

impl Language {
    /// All supported languages, in a stable order.
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Hindi,
        Language::Kannada,
        Language::Tamil,
        Language::Telugu,
        Language::Malayalam,
        Language::Bengali,
    ];

    /// Resolves a caller-supplied identifier to a language.
    ///
    /// Matching is case-insensitive and total: anything unrecognized falls
    /// back to English so a session can always start.
    pub fn parse(identifier: &str) -> Language {
        match identifier.trim().to_lowercase().as_str() {
            "english" => Language::English,
            "hindi" => Language::Hindi,
            "kannada" => Language::Kannada,
            "tamil" => Language::Tamil,
            "telugu" => Language::Telugu,
            "malayalam" => Language::Malayalam,
            "bengali" => Language::Bengali,
            _ => Language::English,
        }
    }

    /// Returns the static profile for this language.
    pub fn profile(&self) -> &'static LanguageProfile {
        match self {
            Language::English => &LanguageProfile {
                display_name: "English",
                response_instruction: "Respond in English",
                aspects: "pronunciation, grammar, and vocabulary",
                stt_locale: "en-US",
                tts_locale: "en",
            },
            Language::Hindi => &LanguageProfile {
                display_name: "Hindi (हिंदी)",
                response_instruction: "Respond in Hindi (Devanagari script). Use simple, conversational Hindi that a learner would understand.",
                aspects: "pronunciation (उच्चारण), grammar (व्याकरण), and vocabulary (शब्दावली)",
                stt_locale: "hi-IN",
                tts_locale: "hi",
            },
            Language::Kannada => &LanguageProfile {
                display_name: "Kannada (ಕನ್ನಡ)",
                response_instruction: "Respond in Kannada (Kannada script). Use simple, conversational Kannada that a learner would understand.",
                aspects: "pronunciation (ಉಚ್ಚಾರಣೆ), grammar (ವ್ಯಾಕರಣ), and vocabulary (ಶಬ್ದಕೋಶ)",
                stt_locale: "kn-IN",
                tts_locale: "kn",
            },
            Language::Tamil => &LanguageProfile {
                display_name: "Tamil (தமிழ்)",
                response_instruction: "Respond in Tamil (Tamil script). Use simple, conversational Tamil that a learner would understand.",
                aspects: "pronunciation (உச்சரிப்பு), grammar (இலக்கணம்), and vocabulary (சொல்வளம்)",
                stt_locale: "ta-IN",
                tts_locale: "ta",
            },
            Language::Telugu => &LanguageProfile {
                display_name: "Telugu (తెలుగు)",
                response_instruction: "Respond in Telugu (Telugu script). Use simple, conversational Telugu that a learner would understand.",
                aspects: "pronunciation (ఉచ్చారణ), grammar (వ్యాకరణం), and vocabulary (పదకోశం)",
                stt_locale: "te-IN",
                tts_locale: "te",
            },
            Language::Malayalam => &LanguageProfile {
                display_name: "Malayalam (മലയാളം)",
                response_instruction: "Respond in Malayalam (Malayalam script). Use simple, conversational Malayalam that a learner would understand.",
                aspects: "pronunciation (ഉച്ചാരണം), grammar (വ്യാകരണം), and vocabulary (പദസമ്പത്ത്)",
                stt_locale: "ml-IN",
                tts_locale: "ml",
            },
            Language::Bengali => &LanguageProfile {
                display_name: "Bengali (বাংলা)",
                response_instruction: "Respond in Bengali (Bengali script). Use simple, conversational Bengali that a learner would understand.",
                aspects: "pronunciation (উচ্চারণ), grammar (ব্যাকরণ), and vocabulary (শব্দভাণ্ডার)",
                stt_locale: "bn-IN",
                tts_locale: "bn",
            },
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "english"),
            Language::Hindi => write!(f, "hindi"),
            Language::Kannada => write!(f, "kannada"),
            Language::Tamil => write!(f, "tamil"),
            Language::Telugu => write!(f, "telugu"),
            Language::Malayalam => write!(f, "malayalam"),
            Language::Bengali => write!(f, "bengali"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_known_identifiers() {
        assert_eq!(Language::parse("english"), Language::English);
        assert_eq!(Language::parse("hindi"), Language::Hindi);
        assert_eq!(Language::parse("kannada"), Language::Kannada);
        assert_eq!(Language::parse("tamil"), Language::Tamil);
        assert_eq!(Language::parse("telugu"), Language::Telugu);
        assert_eq!(Language::parse("malayalam"), Language::Malayalam);
        assert_eq!(Language::parse("bengali"), Language::Bengali);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Language::parse("Hindi"), Language::Hindi);
        assert_eq!(Language::parse("TAMIL"), Language::Tamil);
        assert_eq!(Language::parse("  Bengali "), Language::Bengali);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_english() {
        assert_eq!(Language::parse("klingon"), Language::English);
        assert_eq!(Language::parse(""), Language::English);
        assert_eq!(Language::parse("fr-FR"), Language::English);
    }

    #[test]
    fn test_profiles_are_distinct_and_complete() {
        let mut names = HashSet::new();
        let mut stt = HashSet::new();
        for lang in Language::ALL {
            let profile = lang.profile();
            assert!(!profile.display_name.is_empty());
            assert!(!profile.response_instruction.is_empty());
            assert!(!profile.aspects.is_empty());
            assert!(names.insert(profile.display_name));
            assert!(stt.insert(profile.stt_locale));
        }
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Language::English.profile().stt_locale, "en-US");
        assert_eq!(Language::English.profile().tts_locale, "en");
        assert_eq!(Language::Hindi.profile().stt_locale, "hi-IN");
        assert_eq!(Language::Malayalam.profile().tts_locale, "ml");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Language::Telugu).unwrap();
        assert_eq!(json, "\"telugu\"");
        let parsed: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Language::Telugu);
    }

    #[test]
    fn test_display_matches_wire_identifier() {
        for lang in Language::ALL {
            assert_eq!(Language::parse(&lang.to_string()), lang);
        }
    }
}
