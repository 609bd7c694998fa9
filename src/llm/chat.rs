use async_trait::async_trait;
use serde::Serialize;

use crate::error::ProviderError;

/// Supported role values in chat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged entry of a chat request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub usage: Option<Usage>,
}

impl ChatReply {
    /// Reported total, or 0 when the service sent no `usage` block.
    pub fn total_tokens(&self) -> u32 {
        self.usage
            .as_ref()
            .and_then(|usage| usage.total_tokens)
            .unwrap_or(0)
    }
}

/// A hosted chat-completion endpoint.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatReply, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatReply, MessageRole, Usage};
    use serde_json::json;

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let value = serde_json::to_value(vec![
            ChatMessage::system("s"),
            ChatMessage::user("u"),
            ChatMessage::assistant("a"),
        ])
        .expect("messages should serialize");
        assert_eq!(
            value,
            json!([
                {"role": "system", "content": "s"},
                {"role": "user", "content": "u"},
                {"role": "assistant", "content": "a"},
            ])
        );
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn total_tokens_defaults_to_zero() {
        let reply = ChatReply {
            content: "hi".to_string(),
            usage: None,
        };
        assert_eq!(reply.total_tokens(), 0);

        let reply = ChatReply {
            content: "hi".to_string(),
            usage: Some(Usage {
                total_tokens: Some(42),
                ..Usage::default()
            }),
        };
        assert_eq!(reply.total_tokens(), 42);
    }
}
