//! Embedding API client for the inference endpoint

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::GenAiConfig;
use crate::errors::RagChatError;
use crate::errors::Result;
use crate::genai::error_for_status;
use crate::genai::GenAiEndpoint;
use crate::genai::ServingMode;

/// What the embedded text will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    SearchQuery,
    SearchDocument,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedTextDetails<'a> {
    inputs: &'a [&'a str],
    serving_mode: ServingMode<'a>,
    compartment_id: &'a str,
    truncate: &'static str,
    input_type: InputType,
}

#[derive(Deserialize)]
struct EmbedTextResult {
    embeddings: Vec<Vec<f32>>,
}

/// Client for generating embeddings
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    endpoint: GenAiEndpoint,
    model: String,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(config: &GenAiConfig) -> Result<Self> {
        Ok(Self {
            endpoint: GenAiEndpoint::new(config)?,
            model: config.embedding_model.clone(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate embeddings for multiple texts in one request
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, wrong number of embeddings)
    pub async fn generate_batch(
        &self,
        texts: &[&str],
        input_type: InputType,
    ) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Calling embeddings API: {} ({} inputs)",
            self.endpoint.action_url("embedText"),
            texts.len()
        );

        let request = EmbedTextDetails {
            inputs: texts,
            serving_mode: ServingMode::on_demand(&self.model),
            compartment_id: self.endpoint.compartment_id(),
            truncate: "END",
            input_type,
        };

        let response = self
            .endpoint
            .post("embedText", &request)
            .send()
            .await
            .map_err(|e| RagChatError::Embedding(e.to_string()))?;
        let response = error_for_status(response)
            .await
            .map_err(RagChatError::Embedding)?;

        let result: EmbedTextResult = response
            .json()
            .await
            .map_err(|e| RagChatError::Embedding(format!("Failed to parse response: {e}")))?;

        if result.embeddings.len() != texts.len() {
            return Err(RagChatError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                result.embeddings.len()
            )));
        }

        Ok(result.embeddings)
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str, input_type: InputType) -> Result<Vec<f32>> {
        self.generate_batch(&[text], input_type)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagChatError::Embedding("No embedding in response".to_string()))
    }
}
