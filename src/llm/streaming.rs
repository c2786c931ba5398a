//! Streaming response handling

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use serde::Deserialize;

use crate::errors::RagChatError;
use crate::errors::Result;

type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Streaming response from LLM
pub struct StreamingResponse {
    stream: FragmentStream,
}

impl StreamingResponse {
    pub fn new(stream: FragmentStream) -> Self {
        Self { stream }
    }

    /// Build a response from an already known sequence of fragments
    pub fn from_results(items: Vec<Result<String>>) -> Self {
        Self::new(Box::pin(futures::stream::iter(items)))
    }

    /// Collect all chunks into a single string
    pub async fn collect_all(mut self) -> Result<String> {
        let mut result = String::new();
        while let Some(chunk) = self.stream.next().await {
            result.push_str(&chunk?);
        }
        Ok(result)
    }

    /// Pull the next fragment
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        self.stream.next().await
    }

    /// Get the underlying stream
    pub fn into_stream(self) -> FragmentStream {
        self.stream
    }
}

/// One server-sent event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub id: Option<String>,
    pub data: String,
}

/// Incremental `text/event-stream` parser
///
/// Bytes are buffered until a blank line completes an event, so a multi-byte
/// character split across two network chunks is decoded intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed a chunk and return every event it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend(chunk.iter().filter(|&&b| b != b'\r'));

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buffer.drain(..pos + 2).collect();
            if let Some(event) = parse_event_block(&block[..pos]) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing event that was not terminated by a blank line
    pub fn finish(&mut self) -> Option<SseEvent> {
        let block = std::mem::take(&mut self.buffer);
        parse_event_block(&block)
    }
}

fn parse_event_block(block: &[u8]) -> Option<SseEvent> {
    let text = String::from_utf8_lossy(block);
    let mut event = SseEvent::default();
    let mut data_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        } else if let Some(value) = line.strip_prefix("event:") {
            event.event = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("id:") {
            event.id = Some(value.trim().to_string());
        }
        // Comments (`:`) and `retry:` are ignored
    }

    if data_lines.is_empty() {
        return None;
    }
    event.data = data_lines.join("\n");
    Some(event)
}

/// Payload of one streamed chat event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatStreamEvent {
    text: Option<String>,
    finish_reason: Option<String>,
}

/// What a single stream event contributes
#[derive(Debug, PartialEq, Eq)]
pub enum StreamItem {
    Fragment(String),
    Skip,
    End,
}

/// Interpret a chat stream event; the event carrying `finishReason` ends the stream
pub fn parse_chat_event(data: &str) -> Result<StreamItem> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(StreamItem::Skip);
    }
    if data == "[DONE]" {
        return Ok(StreamItem::End);
    }

    let event: ChatStreamEvent = serde_json::from_str(data)
        .map_err(|e| RagChatError::Generation(format!("Malformed stream event: {e}")))?;

    match (event.finish_reason, event.text) {
        (Some(_), _) => Ok(StreamItem::End),
        (None, Some(text)) => Ok(StreamItem::Fragment(text)),
        (None, None) => Ok(StreamItem::Skip),
    }
}

struct SseState<S> {
    bytes: S,
    decoder: SseDecoder,
    pending: VecDeque<Result<String>>,
    finished: bool,
}

impl<S> SseState<S> {
    /// Queue the fragments of decoded events; returns true once the stream has ended
    fn absorb(&mut self, events: impl IntoIterator<Item = SseEvent>) -> bool {
        for event in events {
            match parse_chat_event(&event.data) {
                Ok(StreamItem::Fragment(text)) => self.pending.push_back(Ok(text)),
                Ok(StreamItem::Skip) => {}
                Ok(StreamItem::End) => return true,
                Err(e) => {
                    self.pending.push_back(Err(e));
                    return true;
                }
            }
        }
        false
    }
}

/// Adapt an SSE byte stream into ordered text fragments
pub fn fragments_from_sse<S>(bytes: S) -> StreamingResponse
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + Unpin + 'static,
{
    let state = SseState {
        bytes,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    let stream = futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.feed(&chunk);
                    state.finished = state.absorb(events);
                }
                Some(Err(e)) => {
                    state
                        .pending
                        .push_back(Err(RagChatError::Generation(format!("Stream interrupted: {e}"))));
                    state.finished = true;
                }
                None => {
                    let trailing = state.decoder.finish();
                    state.absorb(trailing);
                    state.finished = true;
                }
            }
        }
    });

    StreamingResponse::new(Box::pin(stream))
}
