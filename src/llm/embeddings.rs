use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AiConfig, OPENAI_API_KEY_ENV};
use crate::error::ProviderError;
use crate::http;

const SERVICE: &str = "embedding";

/// A hosted text-embedding endpoint.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError>;
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible `/embeddings` client.
#[derive(Clone)]
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    model: String,
    api_key: String,
    endpoint: String,
    timeout_secs: Option<u64>,
}

impl OpenAiEmbeddings {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
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
            model: model.into(),
            api_key,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            timeout_secs,
        })
    }

    pub fn from_config(api_key: impl Into<String>, config: &AiConfig) -> Result<Self, ProviderError> {
        Self::new(
            api_key,
            config.embedding_model.clone(),
            &config.base_url,
            config.request_timeout_secs,
        )
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiEmbeddings {
    /// Embeds a single string and returns the first vector of the response.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, ProviderError> {
        let payload = EmbeddingRequest {
            model: &self.model,
            input,
        };
        debug!(model = %self.model, chars = input.len(), "sending embedding request");

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload);
        let response = http::send(request, SERVICE, self.timeout_secs).await?;
        let body: EmbeddingResponse = http::read_json(response, SERVICE).await?;

        body.data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or(ProviderError::EmptyResponse {
                service: SERVICE,
                what: "embedding data",
            })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
