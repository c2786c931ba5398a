//! Vector table operations

use pgvector::Vector;
use sqlx::Row;

use super::Database;
use crate::config::validate_table_name;
use crate::models::NewPassage;
use crate::models::Passage;
use crate::vector_store::DistanceStrategy;
use crate::RagChatError;
use crate::Result;

impl Database {
    /// Create the pgvector extension, the passage table and its ANN index
    pub async fn init_vector_table(
        &self,
        table: &str,
        dimension: usize,
        strategy: DistanceStrategy,
    ) -> Result<()> {
        validate_table_name(table)?;

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                text TEXT NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                embedding VECTOR({dimension}) NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
            "
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {table}_embedding_idx ON {table} USING hnsw (embedding {})",
            strategy.index_ops()
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Nearest `limit` passages to `embedding`, closest first
    pub async fn similarity_search(
        &self,
        table: &str,
        embedding: Vec<f32>,
        limit: i64,
        strategy: DistanceStrategy,
    ) -> Result<Vec<Passage>> {
        validate_table_name(table)?;
        let operator = strategy.operator();

        let passages = sqlx::query_as::<_, Passage>(&format!(
            r"
            SELECT
                id,
                text,
                metadata,
                (embedding {operator} $1)::float8 AS distance
            FROM {table}
            ORDER BY embedding {operator} $1
            LIMIT $2
            "
        ))
        .bind(Vector::from(embedding))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(passages)
    }

    /// Store passages with their embeddings in one transaction
    pub async fn insert_passages(
        &self,
        table: &str,
        passages: &[NewPassage],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<u64> {
        validate_table_name(table)?;
        if passages.len() != embeddings.len() {
            return Err(RagChatError::Embedding(format!(
                "{} passages but {} embeddings",
                passages.len(),
                embeddings.len()
            )));
        }

        let statement = format!("INSERT INTO {table} (text, metadata, embedding) VALUES ($1, $2, $3)");
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for (passage, embedding) in passages.iter().zip(embeddings) {
            let result = sqlx::query(&statement)
                .bind(&passage.text)
                .bind(&passage.metadata)
                .bind(Vector::from(embedding))
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }

    /// Number of stored passages
    pub async fn count_passages(&self, table: &str) -> Result<i64> {
        validate_table_name(table)?;
        let row = sqlx::query(&format!("SELECT COUNT(*) AS count FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }
}
