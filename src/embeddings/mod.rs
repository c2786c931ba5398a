//! Embeddings generation module
//!
//! Text is embedded by a remote multilingual model on the inference
//! endpoint. Queries and stored passages are embedded with different input
//! types so the model can optimise each side of the search.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ragchat::config::AppConfig;
//! use ragchat::embeddings::EmbeddingService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;

pub use client::EmbeddingClient;
pub use client::InputType;
pub use generator::EmbeddingService;

/// Maximum number of inputs per embedding request
pub const MAX_BATCH_SIZE: usize = 96;
