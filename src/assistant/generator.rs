use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::assistant::prompt::{build_messages, build_system_prompt};
use crate::assistant::reply::{
    DISABLED_ERROR, DISABLED_MESSAGE, DISABLED_MODEL, REPLY_CONFIDENCE, fallback_message,
    follow_up_questions, suggested_topics,
};
use crate::assistant::types::{
    AiResponse, ConversationTurn, ResponseMetadata, RetrievedPassage, UserProfile,
};
use crate::capability::Capability;
use crate::config::{AiConfig, Settings};
use crate::error::ProviderError;
use crate::llm::chat::{ChatCompletion, ChatOptions};
use crate::llm::openai::OpenAiChat;

/// Grounded tutor replies on top of a chat-completion client.
///
/// Remote failures never escape [`ResponseGenerator::generate`]; they are
/// turned into a readable fallback reply with the raw error in metadata.
#[derive(Clone)]
pub struct ResponseGenerator {
    chat: Capability<Arc<dyn ChatCompletion>>,
    options: ChatOptions,
}

impl ResponseGenerator {
    pub fn new(chat: Capability<Arc<dyn ChatCompletion>>, config: &AiConfig) -> Self {
        Self {
            chat,
            options: ChatOptions {
                model: config.model.clone(),
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        }
    }

    /// Wires the OpenAI client when a key is configured, otherwise disabled.
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let chat = match &settings.openai_api_key {
            Some(key) => {
                let client = OpenAiChat::from_config(key.clone(), &settings.ai)?;
                info!(model = %settings.ai.model, "chat completion client initialized");
                Capability::Enabled(Arc::new(client) as Arc<dyn ChatCompletion>)
            }
            None => {
                warn!("OpenAI API key not provided; AI responses are disabled");
                Capability::Disabled
            }
        };
        Ok(Self::new(chat, &settings.ai))
    }

    pub fn is_enabled(&self) -> bool {
        self.chat.is_enabled()
    }

    pub fn model(&self) -> &str {
        &self.options.model
    }

    /// Answers a single question with no history or context.
    pub async fn ask(&self, message: &str) -> AiResponse {
        self.generate(message, &[], &UserProfile::new(), &[]).await
    }

    pub async fn generate(
        &self,
        message: &str,
        prior_turns: &[ConversationTurn],
        user_profile: &UserProfile,
        retrieved: &[RetrievedPassage],
    ) -> AiResponse {
        let Some(chat) = self.chat.client() else {
            return disabled_response();
        };

        let messages = build_messages(build_system_prompt(retrieved), prior_turns, message);
        info!(
            history = prior_turns.len(),
            passages = retrieved.len(),
            profile_fields = user_profile.len(),
            "generating AI response"
        );

        match chat.complete(&messages, &self.options).await {
            Ok(reply) => {
                let tokens_used = reply.total_tokens();
                if let Some(usage) = &reply.usage {
                    debug!(
                        prompt_tokens = ?usage.prompt_tokens,
                        completion_tokens = ?usage.completion_tokens,
                        total_tokens = tokens_used,
                        "chat completion usage"
                    );
                }
                AiResponse {
                    metadata: ResponseMetadata {
                        model: self.options.model.clone(),
                        tokens_used,
                        confidence: REPLY_CONFIDENCE,
                        suggested_topics: suggested_topics(&reply.content),
                        follow_up_questions: follow_up_questions(),
                        error: None,
                        retrieved_context: Some(retrieved.to_vec()),
                    },
                    message: reply.content,
                }
            }
            Err(err) => {
                error!(error = %err, "chat completion failed");
                AiResponse {
                    message: fallback_message(&err),
                    metadata: ResponseMetadata {
                        model: self.options.model.clone(),
                        tokens_used: 0,
                        confidence: 0.0,
                        suggested_topics: Vec::new(),
                        follow_up_questions: Vec::new(),
                        error: Some(err.to_string()),
                        retrieved_context: None,
                    },
                }
            }
        }
    }
}

fn disabled_response() -> AiResponse {
    AiResponse {
        message: DISABLED_MESSAGE.to_string(),
        metadata: ResponseMetadata {
            model: DISABLED_MODEL.to_string(),
            tokens_used: 0,
            confidence: 0.0,
            suggested_topics: Vec::new(),
            follow_up_questions: Vec::new(),
            error: Some(DISABLED_ERROR.to_string()),
            retrieved_context: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseGenerator;
    use crate::capability::Capability;
    use crate::config::AiConfig;

    #[tokio::test]
    async fn disabled_generator_reports_disabled_model() {
        let generator = ResponseGenerator::new(Capability::Disabled, &AiConfig::default());
        assert!(!generator.is_enabled());

        let response = generator.ask("What is osmosis?").await;
        assert_eq!(response.metadata.model, "disabled");
        assert_eq!(response.metadata.tokens_used, 0);
        assert_eq!(response.metadata.confidence, 0.0);
        assert_eq!(
            response.metadata.error.as_deref(),
            Some("OpenAI API key not configured")
        );
        assert!(response.message.starts_with("AI features are currently disabled."));
    }
}
