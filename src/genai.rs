//! Shared plumbing for the generative AI inference endpoint
//!
//! Both the embedding and the chat clients talk to the same service
//! endpoint, authenticate the same way and report errors the same way.

use std::time::Duration;

use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use serde::Serialize;

use crate::config::GenAiConfig;
use crate::errors::RagChatError;
use crate::errors::Result;

/// REST API version prefix of the inference service
pub const API_VERSION: &str = "20231130";

/// How a model is addressed on the service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingMode<'a> {
    pub serving_type: &'static str,
    pub model_id: &'a str,
}

impl<'a> ServingMode<'a> {
    #[must_use]
    pub const fn on_demand(model_id: &'a str) -> Self {
        Self {
            serving_type: "ON_DEMAND",
            model_id,
        }
    }
}

/// Connection settings common to all inference calls
#[derive(Debug, Clone)]
pub struct GenAiEndpoint {
    client: Client,
    base_url: String,
    compartment_id: String,
    auth_token: Option<String>,
}

impl GenAiEndpoint {
    pub fn new(config: &GenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RagChatError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.service_endpoint.trim_end_matches('/').to_string(),
            compartment_id: config.compartment_id.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    #[must_use]
    pub fn compartment_id(&self) -> &str {
        &self.compartment_id
    }

    /// URL of an action such as `chat` or `embedText`
    #[must_use]
    pub fn action_url(&self, action: &str) -> String {
        format!("{}/{API_VERSION}/actions/{action}", self.base_url)
    }

    /// Start a JSON POST to the given action
    pub fn post<T: Serialize + ?Sized>(&self, action: &str, body: &T) -> RequestBuilder {
        let mut request = self
            .client
            .post(self.action_url(action))
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = &self.auth_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }
}

/// Turn a non-2xx response into a message carrying the status and body
pub async fn error_for_status(response: Response) -> std::result::Result<Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(format!("API error ({status}): {error_text}"))
}
