use bytes::Bytes;
use domain::models::ConversationMessage;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::{PipelineError, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    embedding_model: String,
    chat_model: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        embedding_model: impl Into<String>,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.into(),
            base_url: base_url.into(),
            embedding_model: embedding_model.into(),
            chat_model: chat_model.into(),
        }
    }

    /// Embeds one query string. No retries here; a transient failure
    /// propagates to the orchestrator.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(PipelineError::invalid_input("embedding input is empty"));
        }
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
            encoding_format: "float",
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("embedding service", e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::UpstreamUnavailable(format!(
                "embedding service returned {status}: {body}"
            )));
        }
        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream("embedding service", e))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                PipelineError::UpstreamUnavailable("embedding response contained no vectors".into())
            })
    }

    /// Opens a streaming chat completion and exposes the incremental text
    /// deltas as a one-shot stream. Fails with `UpstreamUnavailable` before
    /// the first fragment if the call cannot be established.
    pub async fn chat_stream(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            stream: true,
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("generation service", e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::UpstreamUnavailable(format!(
                "generation service returned {status}: {body}"
            )));
        }
        debug!(model = %self.chat_model, "generation stream established");
        Ok(delta_stream(response.bytes_stream().boxed()).boxed())
    }
}

struct SseState<S> {
    body: S,
    buf: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
}

/// Turns a server-sent-events byte stream into a stream of text fragments.
///
/// The body is polled only when the consumer asks for the next fragment, so
/// a slow reader suspends the upstream read instead of buffering the whole
/// answer. A transport error mid-body surfaces as a terminal
/// `StreamInterrupted` item; fragments already yielded stay delivered.
fn delta_stream<S, E>(body: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = SseState {
        body,
        buf: Vec::new(),
        pending: VecDeque::new(),
        done: false,
    };
    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(fragment) = st.pending.pop_front() {
                return Some((Ok(fragment), st));
            }
            if st.done {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => {
                    st.buf.extend_from_slice(&chunk);
                    // Lines are complete UTF-8 units; only the raw buffer
                    // may split a multi-byte character across chunks.
                    while let Some(pos) = st.buf.iter().position(|&b| b == b'\n') {
                        let line: Vec<u8> = st.buf.drain(..=pos).collect();
                        let line = String::from_utf8_lossy(&line);
                        match parse_sse_line(line.trim_end()) {
                            SseEvent::Fragment(text) => st.pending.push_back(text),
                            SseEvent::Done => {
                                st.done = true;
                                break;
                            }
                            SseEvent::Skip => {}
                        }
                    }
                }
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(PipelineError::StreamInterrupted(e.to_string())), st));
                }
                None => {
                    // Upstream closed without [DONE]; treat as normal end.
                    st.done = true;
                }
            }
        }
    })
}

enum SseEvent {
    Fragment(String),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> SseEvent {
    let Some(data) = line.strip_prefix("data:") else {
        return SseEvent::Skip;
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return SseEvent::Done;
    }
    let Ok(chunk) = serde_json::from_str::<StreamChunk>(data) else {
        return SseEvent::Skip;
    };
    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .unwrap_or_default();
    if content.is_empty() {
        SseEvent::Skip
    } else {
        SseEvent::Fragment(content)
    }
}
