//! Retrieval-augmented chat
//!
//! A request moves through retrieval (optional), prompt rendering and
//! generation. The pipeline only depends on two traits:
//! - [`Retriever`] finds the passages closest to a query
//! - [`crate::llm::ChatModel`] turns the rendered prompt into text
//!
//! # Examples
//!
//! ```rust,no_run
//! use ragchat::config::AppConfig;
//! use ragchat::services::Services;
//! use ragchat::session::ChatSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let services = Services::connect(&config).await?;
//!     let mut session = ChatSession::new();
//!
//!     let answer = services
//!         .pipeline()
//!         .respond(&mut session, "What is Oracle Database?", &config.chat, |fragment, _| {
//!             print!("{fragment}");
//!         })
//!         .await?;
//!     println!();
//!     println!("{} turns, answer: {:?}", session.len(), answer);
//!
//!     services.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;

use async_trait::async_trait;

pub use context::ContextAssembler;
pub use pipeline::ChatPipeline;
pub use pipeline::RequestState;

use crate::errors::Result;
use crate::models::Passage;

/// Source of passages for the context slot
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Exactly `k` nearest passages to `query` (fewer if the table is smaller)
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>>;
}
