//! Vector store adapter over the passage table
//!
//! Binds the database, the embedding service, a table name and a distance
//! strategy. Connecting runs one probe query so a bad setup fails at startup
//! rather than on the first chat request.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::validate_table_name;
use crate::config::AppConfig;
use crate::config::PROBE_QUERY;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::errors::RagChatError;
use crate::errors::Result;
use crate::models::NewPassage;
use crate::models::Passage;
use crate::rag::Retriever;

/// Distance used to rank passages against a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceStrategy {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

impl DistanceStrategy {
    /// pgvector distance operator
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Cosine => "<=>",
            Self::Euclidean => "<->",
            Self::DotProduct => "<#>",
        }
    }

    /// Operator class for the HNSW index
    #[must_use]
    pub const fn index_ops(self) -> &'static str {
        match self {
            Self::Cosine => "vector_cosine_ops",
            Self::Euclidean => "vector_l2_ops",
            Self::DotProduct => "vector_ip_ops",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::DotProduct => "dot_product",
        }
    }
}

/// Passage table searchable by natural-language query
pub struct VectorStore {
    database: Arc<Database>,
    embeddings: Arc<EmbeddingService>,
    table: String,
    strategy: DistanceStrategy,
}

impl VectorStore {
    pub fn new(
        database: Arc<Database>,
        embeddings: Arc<EmbeddingService>,
        table: impl Into<String>,
        strategy: DistanceStrategy,
    ) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            database,
            embeddings,
            table,
            strategy,
        })
    }

    /// Bind the store and run the probe query once
    ///
    /// The probe result is only logged.
    pub async fn connect(
        config: &AppConfig,
        database: Arc<Database>,
        embeddings: Arc<EmbeddingService>,
    ) -> Result<Self> {
        let store = Self::new(
            database,
            embeddings,
            config.table_name(),
            config.database.distance_strategy,
        )?;

        let probe_query = if config.genai.probe_query.trim().is_empty() {
            PROBE_QUERY
        } else {
            config.genai.probe_query.as_str()
        };
        let probe = store
            .similarity_search(probe_query, 1)
            .await
            .map_err(|e| RagChatError::Connection(format!("vector store probe failed: {e}")))?;
        info!(
            "Vector store ready: {}, probe '{}' matched {} passage(s)",
            store.describe(),
            probe_query,
            probe.len()
        );

        Ok(store)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// One-line summary of the table, distance and embedding model
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "table={}, strategy={}, embeddings={} ({} dims)",
            self.table,
            self.strategy.as_str(),
            self.embeddings.model(),
            self.embeddings.dimension()
        )
    }

    /// The `k` passages closest to `query`
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        debug!("Similarity search: k={}, query={}", k, query);
        let embedding = self.embeddings.generate(query).await?;
        let limit = i64::try_from(k)
            .map_err(|_| RagChatError::InvalidOption(format!("k = {k} is too large")))?;
        self.database
            .similarity_search(&self.table, embedding, limit, self.strategy)
            .await
    }

    /// Embed passages as documents and store them
    pub async fn add_texts(&self, passages: &[NewPassage]) -> Result<u64> {
        if passages.is_empty() {
            return Ok(0);
        }
        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let embeddings = self.embeddings.generate_batch(&texts).await?;
        let inserted = self
            .database
            .insert_passages(&self.table, passages, embeddings)
            .await?;
        info!("Stored {} passage(s) in {}", inserted, self.table);
        Ok(inserted)
    }

    /// Number of stored passages
    pub async fn count(&self) -> Result<i64> {
        self.database.count_passages(&self.table).await
    }
}

#[async_trait]
impl Retriever for VectorStore {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        self.similarity_search(query, k).await.map_err(|e| match e {
            RagChatError::Retrieval(_) => e,
            other => RagChatError::Retrieval(other.to_string()),
        })
    }
}
