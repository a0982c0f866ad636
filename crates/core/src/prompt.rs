//! Prompt Construction
//!
//! Pure text composition for the three prompts the engine sends to the LLM:
//! the per-turn system instruction, the running conversation context, and the
//! final-turn assessment instruction. No I/O and no state.

use crate::language::LanguageProfile;
use crate::session::Turn;

/// Number of trailing turns included in the assessment prompt.
pub const ASSESSMENT_HISTORY_WINDOW: usize = 20;

/// Builds the system instruction for a session.
///
/// Embeds the topic, lesson content, the language's response instruction and
/// tracked aspects, the turn counter, and the literal JSON schema the model
/// must use on the final turn.
pub fn system_prompt(
    topic: &str,
    lesson_content: &str,
    profile: &LanguageProfile,
    turn_count: u32,
    max_turns: u32,
) -> String {
    let name = profile.display_name;
    let name_upper = name.to_uppercase();
    format!(
        r#"You are a {name} language learning companion helping a student practice what they've learned.

Topic: {topic}
Lesson Content: {lesson_content}
Language: {name}

IMPORTANT: {instruction}

Your role:
1. Have a natural conversation with the student about the topic IN {name_upper}
2. Ask questions to assess their understanding
3. Correct mistakes gently and provide better alternatives
4. Track {aspects} usage
5. After {max_turns} exchanges, provide a final score and detailed feedback

Conversation guidelines:
- Keep responses conversational and encouraging
- Ask follow-up questions to assess understanding
- Note any grammatical errors or pronunciation issues
- Be supportive and constructive
- Use simple, clear language appropriate for a learner

Current turn: {turn_count}/{max_turns}

If this is the final turn, provide a JSON response with:
{{
    "final_assessment": true,
    "score": <number out of 100>,
    "stars": <number 1-5>,
    "message": "<encouraging message IN {name_upper}>",
    "what_you_did_well": "<specific praise IN {name_upper}>",
    "improvement_tip": {{
        "what_they_said": "<exact problematic phrase>",
        "better_way": "<corrected phrase IN {name_upper}>",
        "explanation": "<why this is better IN {name_upper}>"
    }},
    "detailed_feedback": "<comprehensive feedback IN {name_upper}>"
}}

Otherwise, respond naturally IN {name_upper} to continue the conversation."#,
        instruction = profile.response_instruction,
        aspects = profile.aspects,
    )
}

/// Appends the running history to a system prompt, one `role: content` line
/// per turn, in insertion order.
pub fn conversation_prompt(system: &str, history: &[Turn]) -> String {
    let mut prompt = String::with_capacity(system.len() + history.len() * 64);
    prompt.push_str(system);
    prompt.push_str("\n\nConversation history:\n");
    for turn in history {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
    }
    prompt
}

/// Builds the final-turn assessment instruction from the trailing history
/// window, demanding a bare JSON object matching the literal example.
pub fn assessment_prompt(history: &[Turn]) -> String {
    let window_start = history.len().saturating_sub(ASSESSMENT_HISTORY_WINDOW);
    let window = &history[window_start..];
    let serialized = serde_json::to_string_pretty(window)
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Based on this conversation, provide a final assessment as ONLY valid JSON (no markdown, no backticks, no preamble):

Conversation:
{serialized}

Return ONLY this JSON structure, nothing else:
{{
    "score": 85,
    "stars": 4,
    "message": "Great job!",
    "what_you_did_well": "Your pronunciation was clear and you used polite language.",
    "improvement_tip": {{
        "what_they_said": "I want hot",
        "better_way": "I would like it hot, please",
        "explanation": "Adding 'I would like' and 'please' sounds more polite and natural"
    }}
}}"#
    )
}
