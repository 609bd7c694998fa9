use crate::error::{FailureKind, ProviderError};

pub const TOPIC_KEYWORDS: [&str; 6] = ["learn", "study", "understand", "concept", "topic", "subject"];
pub const MAX_SUGGESTED_TOPICS: usize = 3;

/// Always the same three questions; the reply text is not inspected.
pub const FOLLOW_UP_QUESTIONS: [&str; 3] = [
    "Would you like me to explain this in more detail?",
    "Can you tell me more about what you're studying?",
    "Would you like to see some practice problems?",
];

/// Confidence reported for every successful reply. The chat API exposes no
/// real signal.
pub const REPLY_CONFIDENCE: f64 = 0.9;

pub const DISABLED_MODEL: &str = "disabled";
pub const DISABLED_MESSAGE: &str = "AI features are currently disabled. Please add your OpenAI API key to the .env file to enable AI assistance.";
pub const DISABLED_ERROR: &str = "OpenAI API key not configured";

const FALLBACK_PREFIX: &str = "I'm having trouble connecting to the AI service. ";

pub fn suggested_topics(reply: &str) -> Vec<String> {
    let lowered = reply.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .take(MAX_SUGGESTED_TOPICS)
        .map(|keyword| format!("Explore {keyword} further"))
        .collect()
}

pub fn follow_up_questions() -> Vec<String> {
    FOLLOW_UP_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// User-facing text for a failed completion.
pub fn fallback_message(err: &ProviderError) -> String {
    let advice = match err.kind() {
        FailureKind::Credentials => "Please check your OpenAI API key in the .env file.",
        FailureKind::RateLimited => "Rate limit exceeded. Please try again later.",
        FailureKind::Other => "Please try again or contact support if the issue persists.",
    };
    format!("{FALLBACK_PREFIX}{advice}")
}
