//! Conversation Engine
//!
//! Drives one accepted user message through the session state machine and
//! the LLM collaborator: append the user turn, build the running prompt,
//! fetch the reply, and on the final turn run the assessment pass.
//!
//! History mutation deliberately precedes the LLM call and is not rolled
//! back on failure: a failed call leaves an orphaned user turn, and a retry
//! by the caller appends a fresh one.

use crate::assessment::{Assessment, parse_assessment};
use crate::llm::LlmClient;
use crate::prompt;
use crate::session::{Session, TurnResult};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Bounds on one logical collaborator call.
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    /// Hard deadline for a single attempt.
    pub timeout: Duration,
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before each retry.
    pub backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Orchestrates turns for any session. One engine is shared by all requests.
pub struct ConversationEngine {
    llm: Arc<dyn LlmClient>,
    policy: CallPolicy,
}

impl ConversationEngine {
    pub fn new(llm: Arc<dyn LlmClient>, policy: CallPolicy) -> Self {
        Self { llm, policy }
    }

    /// Processes one user message and returns the turn outcome.
    ///
    /// On a non-final turn this issues one LLM call; on the final turn a
    /// second call produces the assessment. A failed assessment call never
    /// surfaces to the caller: the canned fallback is returned instead.
    pub async fn advance(&self, session: &mut Session, user_text: &str) -> Result<TurnResult> {
        session.push_user(user_text);
        debug!(
            session_id = %session.session_id,
            turn = session.turn_count(),
            "processing user turn"
        );

        let system = prompt::system_prompt(
            &session.topic,
            &session.lesson_content,
            session.language.profile(),
            session.turn_count(),
            session.max_turns(),
        );
        let context = prompt::conversation_prompt(&system, session.history());

        let reply = self
            .generate_with_retry(&context)
            .await
            .context("LLM reply generation failed")?;
        session.push_assistant(&reply);

        if !session.is_final() {
            return Ok(TurnResult::Reply { message: reply });
        }

        debug!(session_id = %session.session_id, "final turn reached, generating assessment");
        let assessment = match self
            .generate_with_retry(&prompt::assessment_prompt(session.history()))
            .await
        {
            Ok(text) => parse_assessment(&text),
            Err(err) => {
                error!(error = %err, "assessment call failed, using fallback");
                Assessment::call_failure_fallback()
            }
        };

        Ok(TurnResult::Final { assessment })
    }

    /// Runs `generate` under the call policy: bounded per-attempt timeout
    /// and a small retry budget for transient failures.
    async fn generate_with_retry(&self, prompt_text: &str) -> Result<String> {
        let mut last_error = None;
        for attempt in 1..=self.policy.attempts {
            if attempt > 1 {
                tokio::time::sleep(self.policy.backoff).await;
            }
            match timeout(self.policy.timeout, self.llm.generate(prompt_text)).await {
                Ok(Ok(reply)) => return Ok(reply),
                Ok(Err(err)) => {
                    warn!(attempt, error = %err, "LLM call failed");
                    last_error = Some(err);
                }
                Err(_) => {
                    warn!(attempt, timeout = ?self.policy.timeout, "LLM call timed out");
                    last_error = Some(anyhow::anyhow!(
                        "LLM call timed out after {:?}",
                        self.policy.timeout
                    ));
                }
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("LLM call failed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::llm::MockLlmClient;
    use crate::session::MAX_TURNS;
    use mockall::Sequence;

    fn test_policy() -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_secs(5),
            attempts: 2,
            backoff: Duration::from_millis(1),
        }
    }

    fn session() -> Session {
        Session::new("s1", "Ordering at a Café", "Basic phrases", Language::English)
    }

    const ASSESSMENT_JSON: &str = r#"{
        "score": 92,
        "stars": 5,
        "message": "Wonderful work!",
        "what_you_did_well": "Polite and natural phrasing.",
        "improvement_tip": {
            "what_they_said": "give coffee",
            "better_way": "could I have a coffee, please",
            "explanation": "Requests sound softer with 'could I'"
        }
    }"#;

    #[tokio::test]
    async fn test_non_final_turn_returns_reply() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok("What would you like to order?".to_string()));

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        let mut session = session();
        let result = engine.advance(&mut session, "Hello").await.unwrap();

        assert_eq!(
            result,
            TurnResult::Reply {
                message: "What would you like to order?".to_string()
            }
        );
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.history().len(), 2);
        assert!(!session.is_final());
    }

    #[tokio::test]
    async fn test_prompt_contains_history_and_turn_counter() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate()
            .withf(|prompt: &str| {
                prompt.contains("Current turn: 1/10") && prompt.contains("user: Hello")
            })
            .times(1)
            .returning(|_| Ok("Hi!".to_string()));

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        engine.advance(&mut session(), "Hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_final_turn_runs_assessment_pass() {
        let mut mock = MockLlmClient::new();
        let mut seq = Sequence::new();
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Final reply".to_string()));
        mock.expect_generate()
            .withf(|prompt: &str| prompt.contains("final assessment as ONLY valid JSON"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ASSESSMENT_JSON.to_string()));

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        let mut session = session();
        for i in 1..MAX_TURNS {
            session.push_user(format!("turn {i}"));
            session.push_assistant("reply");
        }

        let result = engine.advance(&mut session, "last message").await.unwrap();
        match result {
            TurnResult::Final { assessment } => {
                assert_eq!(assessment.score, 92);
                assert_eq!(assessment.stars, 5);
            }
            other => panic!("expected final result, got {other:?}"),
        }
        assert_eq!(session.turn_count(), MAX_TURNS);
        assert!(session.is_final());
    }

    #[tokio::test]
    async fn test_full_session_scenario() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate().returning(|prompt: &str| {
            if prompt.contains("final assessment as ONLY valid JSON") {
                Ok(ASSESSMENT_JSON.to_string())
            } else {
                Ok("Keep going!".to_string())
            }
        });

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        let mut session = session();

        for i in 1..MAX_TURNS {
            let result = engine
                .advance(&mut session, &format!("message {i}"))
                .await
                .unwrap();
            assert!(!result.is_final(), "turn {i} should not be final");
            assert_eq!(session.turn_count(), i);
        }

        let result = engine.advance(&mut session, "message 10").await.unwrap();
        assert!(result.is_final());
        assert_eq!(session.turn_count(), MAX_TURNS);
    }

    #[tokio::test]
    async fn test_assessment_call_failure_yields_fallback() {
        let mut mock = MockLlmClient::new();
        let mut seq = Sequence::new();
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Final reply".to_string()));
        // Both assessment attempts fail; the caller still gets an assessment.
        mock.expect_generate()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("upstream unavailable")));

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        let mut session = session();
        for i in 1..MAX_TURNS {
            session.push_user(format!("turn {i}"));
            session.push_assistant("reply");
        }

        let result = engine.advance(&mut session, "last").await.unwrap();
        match result {
            TurnResult::Final { assessment } => {
                assert_eq!(assessment, Assessment::call_failure_fallback());
            }
            other => panic!("expected final result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let mut mock = MockLlmClient::new();
        let mut seq = Sequence::new();
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("connection reset")));
        mock.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("recovered".to_string()));

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        let result = engine.advance(&mut session(), "Hello").await.unwrap();
        assert_eq!(
            result,
            TurnResult::Reply {
                message: "recovered".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failed_reply_leaves_orphaned_user_turn() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate()
            .times(2)
            .returning(|_| Err(anyhow::anyhow!("unavailable")));

        let engine = ConversationEngine::new(Arc::new(mock), test_policy());
        let mut session = session();
        let result = engine.advance(&mut session, "Hello").await;

        assert!(result.is_err());
        // The user turn and counter increment are not rolled back.
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.history().len(), 1);
    }
}
