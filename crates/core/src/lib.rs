pub mod assessment;
pub mod engine;
pub mod language;
pub mod llm;
pub mod prompt;
pub mod registry;
pub mod session;
pub mod speech;

/// Default topic for sessions started without one.
pub const DEFAULT_TOPIC: &str = "Ordering at a Café";

/// Default lesson content for sessions started without any.
pub const DEFAULT_LESSON_CONTENT: &str = "Basic café ordering phrases and polite requests";

/// The fixed greeting that opens every session's first turn.
pub const SESSION_GREETING: &str = "Hello, I'm ready to practice!";
