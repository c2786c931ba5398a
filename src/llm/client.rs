//! Chat client for the generative AI inference endpoint

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::streaming::fragments_from_sse;
use super::ChatModel;
use super::SamplingParams;
use super::StreamingResponse;
use crate::config::AppConfig;
use crate::errors::RagChatError;
use crate::errors::Result;
use crate::genai::error_for_status;
use crate::genai::GenAiEndpoint;
use crate::genai::ServingMode;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatDetails<'a> {
    compartment_id: &'a str,
    serving_mode: ServingMode<'a>,
    chat_request: CohereChatRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CohereChatRequest<'a> {
    api_format: &'static str,
    message: &'a str,
    is_stream: bool,
    max_tokens: u32,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatResult {
    chat_response: ChatResponseBody,
}

#[derive(Deserialize)]
struct ChatResponseBody {
    text: String,
}

/// Handle to the chat model
#[derive(Debug, Clone)]
pub struct LlmService {
    endpoint: GenAiEndpoint,
    model: String,
}

impl LlmService {
    /// Create a new LLM service
    pub fn new(config: &AppConfig) -> Result<Self> {
        let endpoint = GenAiEndpoint::new(&config.genai)?;
        info!("LLM service configured: model={}", config.genai.chat_model);
        Ok(Self {
            endpoint,
            model: config.genai.chat_model.clone(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(
        &'a self,
        prompt: &'a str,
        params: &SamplingParams,
        is_stream: bool,
    ) -> ChatDetails<'a> {
        ChatDetails {
            compartment_id: self.endpoint.compartment_id(),
            serving_mode: ServingMode::on_demand(&self.model),
            chat_request: CohereChatRequest {
                api_format: "COHERE",
                message: prompt,
                is_stream,
                max_tokens: params.max_tokens,
                temperature: params.temperature,
                top_k: params.top_k,
                top_p: params.top_p,
                frequency_penalty: params.frequency_penalty,
                presence_penalty: params.presence_penalty,
            },
        }
    }

    async fn send(
        &self,
        prompt: &str,
        params: &SamplingParams,
        is_stream: bool,
    ) -> Result<reqwest::Response> {
        debug!(
            "Calling chat API: {} (stream={}, {} prompt chars)",
            self.endpoint.action_url("chat"),
            is_stream,
            prompt.chars().count()
        );

        let mut request = self
            .endpoint
            .post("chat", &self.request_body(prompt, params, is_stream));
        if is_stream {
            request = request.header("Accept", "text/event-stream");
        }

        let response = request
            .send()
            .await
            .map_err(|e| RagChatError::Generation(e.to_string()))?;

        error_for_status(response)
            .await
            .map_err(RagChatError::Generation)
    }
}

#[async_trait]
impl ChatModel for LlmService {
    async fn stream(&self, prompt: &str, params: &SamplingParams) -> Result<StreamingResponse> {
        let response = self.send(prompt, params, true).await?;
        Ok(fragments_from_sse(Box::pin(response.bytes_stream())))
    }

    async fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String> {
        let response = self.send(prompt, params, false).await?;
        let result: ChatResult = response
            .json()
            .await
            .map_err(|e| RagChatError::Generation(format!("Failed to parse response: {e}")))?;
        Ok(result.chat_response.text)
    }
}
