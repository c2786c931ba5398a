//! Process-lifetime clients
//!
//! Built once at startup and shared by every request. `shutdown` releases the
//! database pool; call it before the process exits.

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::llm::LlmService;
use crate::rag::ChatPipeline;
use crate::vector_store::VectorStore;
use crate::Result;

pub struct Services {
    database: Arc<Database>,
    vector_store: Arc<VectorStore>,
    llm: Arc<LlmService>,
    pipeline: Arc<ChatPipeline>,
}

impl Services {
    /// Open the pool, build the clients and probe the vector store
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embeddings = Arc::new(EmbeddingService::new(config)?);
        let llm = Arc::new(LlmService::new(config)?);

        let vector_store = match VectorStore::connect(config, database.clone(), embeddings).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                database.close().await;
                return Err(e);
            }
        };

        let pipeline = Arc::new(ChatPipeline::new(vector_store.clone(), llm.clone()));
        info!("Services ready (chat model {})", llm.model());

        Ok(Self {
            database,
            vector_store,
            llm,
            pipeline,
        })
    }

    #[must_use]
    pub fn pipeline(&self) -> Arc<ChatPipeline> {
        self.pipeline.clone()
    }

    #[must_use]
    pub fn vector_store(&self) -> &VectorStore {
        &self.vector_store
    }

    #[must_use]
    pub fn llm(&self) -> &LlmService {
        &self.llm
    }

    /// Release the database pool
    pub async fn shutdown(&self) {
        self.database.close().await;
        info!("Services shut down");
    }
}
