//! LLM chat client
//!
//! [`LlmService`] is the production [`ChatModel`]; the pipeline only sees the
//! trait, which keeps it testable against scripted fragment streams.

pub mod client;
pub mod prompts;
pub mod streaming;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

pub use client::LlmService;
pub use prompts::ChatPrompts;
pub use prompts::PromptTemplate;
pub use streaming::StreamingResponse;

use crate::errors::Result;

/// Sampling parameters passed to the model verbatim
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

/// A remote model that turns a rendered prompt into text
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Issue a streaming call; fragments arrive in order
    async fn stream(&self, prompt: &str, params: &SamplingParams) -> Result<StreamingResponse>;

    /// Issue a single non-streaming call
    async fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String>;
}
