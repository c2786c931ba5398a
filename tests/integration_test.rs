//! End-to-end checks against a real PostgreSQL with pgvector
//!
//! The inference endpoint is replaced by a mock server. Run with
//! `cargo test -- --ignored` once `USERNAME`, `PASSWORD` and `DSN` point at a
//! scratch database.

use std::sync::Arc;

use ragchat::database::Database;
use ragchat::embeddings::EmbeddingService;
use ragchat::models::NewPassage;
use ragchat::rag::Retriever;
use ragchat::vector_store::DistanceStrategy;
use ragchat::vector_store::VectorStore;
use ragchat::AppConfig;
use ragchat::Result;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

const TABLE: &str = "ragchat_it_passages";

async fn setup(server: &MockServer) -> Result<(AppConfig, Arc<Database>)> {
    let mut config = AppConfig::load_unchecked()?;
    config.database.table_name = TABLE.to_string();
    config.genai.service_endpoint = server.uri();
    config.genai.compartment_id = "ocid1.compartment.test".to_string();
    config.genai.embedding_dimension = 3;
    config.validate()?;

    let database = Arc::new(Database::from_config(&config).await?);
    sqlx::query(&format!("DROP TABLE IF EXISTS {TABLE}"))
        .execute(database.pool())
        .await?;
    database
        .init_vector_table(TABLE, 3, DistanceStrategy::Cosine)
        .await?;
    Ok((config, database))
}

async fn mount_embeddings(server: &MockServer) {
    Mock::given(path("/20231130/actions/embedText"))
        .and(body_partial_json(serde_json::json!({"inputType": "SEARCH_DOCUMENT"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "embeddings": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
        })))
        .mount(server)
        .await;
    Mock::given(path("/20231130/actions/embedText"))
        .and(body_partial_json(serde_json::json!({"inputType": "SEARCH_QUERY"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "embeddings": [[0.9, 0.1, 0.0]]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL with pgvector"]
async fn test_ingest_then_search() -> Result<()> {
    let server = MockServer::start().await;
    mount_embeddings(&server).await;
    let (config, database) = setup(&server).await?;

    let embeddings = Arc::new(EmbeddingService::new(&config)?);
    let store = VectorStore::new(database.clone(), embeddings, TABLE, DistanceStrategy::Cosine)?;

    let inserted = store
        .add_texts(&[
            NewPassage::new("Oracle Database is a converged database."),
            NewPassage::new("Bananas are yellow."),
        ])
        .await?;
    assert_eq!(inserted, 2);
    assert_eq!(store.count().await?, 2);

    let nearest = store.retrieve("What is Oracle Database?", 1).await?;
    assert_eq!(nearest.len(), 1);
    assert_eq!(nearest[0].text, "Oracle Database is a converged database.");

    let both = store.retrieve("What is Oracle Database?", 5).await?;
    assert_eq!(both.len(), 2);
    assert!(both[0].distance <= both[1].distance);

    database.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "requires PostgreSQL with pgvector"]
async fn test_connect_runs_probe_query() -> Result<()> {
    let server = MockServer::start().await;
    mount_embeddings(&server).await;
    let (config, database) = setup(&server).await?;

    let embeddings = Arc::new(EmbeddingService::new(&config)?);
    let store = VectorStore::connect(&config, database.clone(), embeddings).await?;
    assert_eq!(store.table(), TABLE);

    let probes = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains("What is Oracle Database?"))
        .count();
    assert_eq!(probes, 1);

    database.close().await;
    Ok(())
}
