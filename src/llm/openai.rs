use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AiConfig, OPENAI_API_KEY_ENV};
use crate::error::ProviderError;
use crate::http;
use crate::llm::chat::{ChatCompletion, ChatMessage, ChatOptions, ChatReply, Usage};

const SERVICE: &str = "chat completion";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsagePayload>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsagePayload {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout_secs: Option<u64>,
}

impl OpenAiChat {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey {
                key_env: OPENAI_API_KEY_ENV,
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            timeout_secs,
        })
    }

    pub fn from_config(api_key: impl Into<String>, config: &AiConfig) -> Result<Self, ProviderError> {
        Self::new(api_key, &config.base_url, config.request_timeout_secs)
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatReply, ProviderError> {
        let payload = ChatCompletionRequest {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };
        debug!(
            model = %options.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload);
        let response = http::send(request, SERVICE, self.timeout_secs).await?;
        let body: ChatCompletionResponse = http::read_json(response, SERVICE).await?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse {
                service: SERVICE,
                what: "message content",
            })?;
        let usage = body.usage.map(|usage| Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        });

        Ok(ChatReply { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatCompletionRequest, ChatCompletionResponse, OpenAiChat};
    use crate::llm::chat::ChatMessage;
    use serde_json::json;

    #[test]
    fn blank_key_is_rejected() {
        let err = OpenAiChat::new("  ", "https://api.openai.com/v1", None)
            .err()
            .expect("blank key should fail");
        assert_eq!(err.to_string(), "OPENAI_API_KEY is not set in the environment");
    }

    #[test]
    fn endpoint_joins_base_url() {
        let chat = OpenAiChat::new("sk", "http://localhost:8080/v1/", None).expect("valid");
        assert_eq!(chat.endpoint, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn request_body_matches_wire_format() {
        let messages = [ChatMessage::system("be nice"), ChatMessage::user("hi")];
        let value = serde_json::to_value(ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: 1000,
            temperature: 0.5,
        })
        .expect("request should serialize");
        assert_eq!(
            value,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be nice"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 1000,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn response_without_usage_parses() {
        let body: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        }))
        .expect("response should parse");
        assert!(body.usage.is_none());
        assert_eq!(body.choices[0].message.content.as_deref(), Some("hello"));
    }
}
