//! Embedding generation service with preprocessing and batch processing

use tracing::debug;

use super::client::EmbeddingClient;
use super::client::InputType;
use super::MAX_BATCH_SIZE;
use crate::errors::RagChatError;
use crate::errors::Result;

/// Service for generating embeddings of a fixed dimension
pub struct EmbeddingService {
    client: EmbeddingClient,
    dimension: usize,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Ok(Self {
            client: EmbeddingClient::new(&config.genai)?,
            dimension: config.embedding_dimension(),
        })
    }

    /// Embed a search query
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let processed = preprocess_text(text)?;
        let embedding = self.client.generate(&processed, InputType::SearchQuery).await?;
        self.check_dimension(&embedding)?;
        Ok(embedding)
    }

    /// Embed passages for storage, in batches of [`MAX_BATCH_SIZE`]
    pub async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let processed = texts
            .iter()
            .map(|t| preprocess_text(t))
            .collect::<Result<Vec<_>>>()?;

        let mut embeddings = Vec::with_capacity(processed.len());
        for chunk in processed.chunks(MAX_BATCH_SIZE) {
            let inputs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            debug!("Embedding batch of {} passages", inputs.len());
            let batch = self
                .client
                .generate_batch(&inputs, InputType::SearchDocument)
                .await?;
            for embedding in &batch {
                self.check_dimension(embedding)?;
            }
            embeddings.extend(batch);
        }

        Ok(embeddings)
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() == self.dimension {
            Ok(())
        } else {
            Err(RagChatError::Embedding(format!(
                "Expected {}-dimensional embedding, got {}",
                self.dimension,
                embedding.len()
            )))
        }
    }

    /// Get the embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

/// Collapse whitespace runs and reject empty input
pub fn preprocess_text(text: &str) -> Result<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(RagChatError::Embedding(
            "Text contains only whitespace".to_string(),
        ));
    }
    Ok(normalized)
}
