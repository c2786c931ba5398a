//! One chat request: Retrieve -> Render -> Generate

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::errors::Result;
use crate::llm::ChatModel;
use crate::llm::ChatPrompts;
use crate::llm::PromptTemplate;
use crate::options::ChatOptions;
use crate::rag::ContextAssembler;
use crate::rag::Retriever;
use crate::session::ChatSession;

/// Progress of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    /// Only entered when vector search is enabled
    AwaitingRetrieval,
    PromptBuilt,
    Streaming,
    Completed,
}

/// Chat request pipeline bound to a retriever and a chat model
pub struct ChatPipeline {
    retriever: Arc<dyn Retriever>,
    chat_model: Arc<dyn ChatModel>,
    context_assembler: ContextAssembler,
    context_prompt: PromptTemplate,
    bare_prompt: PromptTemplate,
}

impl ChatPipeline {
    pub fn new(retriever: Arc<dyn Retriever>, chat_model: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            chat_model,
            context_assembler: ContextAssembler::default(),
            context_prompt: ChatPrompts::context_qa(),
            bare_prompt: ChatPrompts::bare_question(),
        }
    }

    /// Build the prompt text for `query`, retrieving context when enabled
    pub async fn build_prompt(&self, query: &str, options: &ChatOptions) -> Result<String> {
        let mut values = HashMap::from([("query", query.to_string())]);

        if options.use_vector_search {
            trace_state(RequestState::AwaitingRetrieval);
            let passages = self.retriever.retrieve(query, options.fetch_k).await?;
            debug!("Retrieved {} passage(s) (fetch_k={})", passages.len(), options.fetch_k);
            values.insert("context", self.context_assembler.assemble(&passages));
            self.context_prompt.render(&values)
        } else {
            self.bare_prompt.render(&values)
        }
    }

    /// Answer `prompt` within `session`
    ///
    /// The user turn is appended before any remote call. `on_render` receives
    /// each fragment and the message accumulated so far. The assistant turn is
    /// appended only once generation has finished; on error the transcript
    /// keeps the user turn alone. Blank prompts are ignored and yield `None`.
    pub async fn respond<F>(
        &self,
        session: &mut ChatSession,
        prompt: &str,
        options: &ChatOptions,
        mut on_render: F,
    ) -> Result<Option<String>>
    where
        F: FnMut(&str, &str) + Send,
    {
        if prompt.trim().is_empty() {
            return Ok(None);
        }
        options.validate()?;

        trace_state(RequestState::Idle);
        session.push_user(prompt);

        let result = self.generate(prompt, options, &mut on_render).await;
        match result {
            Ok(message) => {
                session.push_assistant(message.clone());
                trace_state(RequestState::Completed);
                info!(
                    "Session {}: answered in {} chars ({} turns)",
                    session.id,
                    message.chars().count(),
                    session.len()
                );
                Ok(Some(message))
            }
            Err(e) => {
                warn!("Session {}: request aborted: {}", session.id, e);
                Err(e)
            }
        }
    }

    async fn generate<F>(&self, prompt: &str, options: &ChatOptions, on_render: &mut F) -> Result<String>
    where
        F: FnMut(&str, &str) + Send,
    {
        let rendered = self.build_prompt(prompt, options).await?;
        trace_state(RequestState::PromptBuilt);

        let params = options.sampling();
        let mut message = String::new();

        if options.streaming {
            let mut stream = self.chat_model.stream(&rendered, &params).await?;
            trace_state(RequestState::Streaming);
            while let Some(fragment) = stream.next_fragment().await {
                let fragment = fragment?;
                message.push_str(&fragment);
                on_render(&fragment, &message);
            }
        } else {
            message = self.chat_model.generate(&rendered, &params).await?;
            on_render(&message, &message);
        }

        Ok(message)
    }
}

fn trace_state(state: RequestState) {
    debug!("Request state: {:?}", state);
}
