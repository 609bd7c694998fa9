use std::sync::Arc;

use tracing::{error, info, warn};

use crate::capability::Capability;
use crate::config::Settings;
use crate::error::ProviderError;
use crate::llm::embeddings::{EmbeddingModel, OpenAiEmbeddings};

/// Text-to-vector entry point.
///
/// Unlike the response generator this propagates remote failures; only the
/// unconfigured case is absorbed, as `Ok(None)`.
#[derive(Clone)]
pub struct EmbeddingGenerator {
    model: Capability<Arc<dyn EmbeddingModel>>,
}

impl EmbeddingGenerator {
    pub fn new(model: Capability<Arc<dyn EmbeddingModel>>) -> Self {
        Self { model }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let model = match &settings.openai_api_key {
            Some(key) => {
                let client = OpenAiEmbeddings::from_config(key.clone(), &settings.ai)?;
                info!(model = %settings.ai.embedding_model, "embedding client initialized");
                Capability::Enabled(Arc::new(client) as Arc<dyn EmbeddingModel>)
            }
            None => {
                warn!("OpenAI API key not provided; embeddings are disabled");
                Capability::Disabled
            }
        };
        Ok(Self::new(model))
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_enabled()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.client().map(|model| model.model_name())
    }

    pub async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, ProviderError> {
        let Some(model) = self.model.client() else {
            warn!("embedding client not initialized; skipping embedding generation");
            return Ok(None);
        };

        match model.embed(text).await {
            Ok(vector) => Ok(Some(vector)),
            Err(err) => {
                error!(error = %err, "error generating embedding");
                Err(err)
            }
        }
    }

    /// Same as [`EmbeddingGenerator::embed`]; named for search-query call sites.
    pub async fn embed_query(&self, query: &str) -> Result<Option<Vec<f32>>, ProviderError> {
        self.embed(query).await
    }
}
