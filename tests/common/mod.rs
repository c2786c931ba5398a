//! Scripted stand-ins for the retriever and the chat model

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use ragchat::api::AppState;
use ragchat::llm::ChatModel;
use ragchat::llm::SamplingParams;
use ragchat::llm::StreamingResponse;
use ragchat::models::Passage;
use ragchat::options::ChatOptions;
use ragchat::rag::ChatPipeline;
use ragchat::rag::Retriever;
use ragchat::session::SessionManager;
use ragchat::RagChatError;
use ragchat::Result;
use uuid::Uuid;

#[derive(Default)]
pub struct ScriptedRetriever {
    pub fail: bool,
    pub calls: Mutex<Vec<usize>>,
}

#[async_trait]
impl Retriever for ScriptedRetriever {
    async fn retrieve(&self, _query: &str, k: usize) -> Result<Vec<Passage>> {
        self.calls.lock().unwrap().push(k);
        if self.fail {
            return Err(RagChatError::Retrieval("vector search unavailable".to_string()));
        }
        Ok(vec![Passage {
            id: Uuid::new_v4(),
            text: "Oracle Database 23ai supports vector search.".to_string(),
            metadata: serde_json::json!({"source": "fixture"}),
            distance: 0.12,
        }])
    }
}

pub struct ScriptedModel {
    pub fragments: Vec<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(ToString::to_string).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn stream(&self, prompt: &str, _params: &SamplingParams) -> Result<StreamingResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(StreamingResponse::from_results(
            self.fragments.iter().cloned().map(Ok).collect(),
        ))
    }

    async fn generate(&self, prompt: &str, _params: &SamplingParams) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.fragments.concat())
    }
}

pub fn app_state(retriever: Arc<ScriptedRetriever>, model: Arc<ScriptedModel>) -> AppState {
    AppState {
        pipeline: Arc::new(ChatPipeline::new(retriever, model)),
        sessions: Arc::new(SessionManager::default()),
        defaults: ChatOptions::default(),
    }
}
