pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod errors;
pub mod genai;
pub mod llm;
pub mod logging;
pub mod models;
pub mod options;
pub mod rag;
pub mod services;
pub mod session;
pub mod vector_store;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
