//! Passage ingestion from text files

use std::path::Path;
use std::sync::Arc;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::models::NewPassage;
use crate::vector_store::VectorStore;
use crate::AppConfig;
use crate::Result;

/// Split text into passages on blank lines
#[must_use]
pub fn split_passages(text: &str) -> Vec<String> {
    let mut passages = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                passages.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        passages.push(current.join("\n"));
    }

    passages
}

/// Read a file into passages tagged with their source and position
pub fn load_passages(path: &Path) -> Result<Vec<NewPassage>> {
    let text = std::fs::read_to_string(path)?;
    let source = path.display().to_string();
    Ok(split_passages(&text)
        .into_iter()
        .enumerate()
        .map(|(chunk, passage)| {
            NewPassage::new(passage)
                .with_metadata(serde_json::json!({"source": source, "chunk": chunk}))
        })
        .collect())
}

pub async fn handle_ingest(config: &AppConfig, files: &[std::path::PathBuf]) -> Result<()> {
    let mut passages = Vec::new();
    for file in files {
        let loaded = load_passages(file)?;
        if loaded.is_empty() {
            print_warning(&format!("{} has no passages, skipping", file.display()));
        } else {
            print_info(&format!("{}: {} passage(s)", file.display(), loaded.len()));
        }
        passages.extend(loaded);
    }

    if passages.is_empty() {
        print_warning("Nothing to ingest");
        return Ok(());
    }

    let database = Arc::new(Database::from_config(config).await?);
    let embeddings = Arc::new(EmbeddingService::new(config)?);
    let store = VectorStore::new(
        database.clone(),
        embeddings,
        config.table_name(),
        config.database.distance_strategy,
    )?;

    let result = store.add_texts(&passages).await;
    database.close().await;

    let inserted = result?;
    print_success(&format!("Stored {inserted} passage(s) in {}", config.table_name()));
    Ok(())
}
