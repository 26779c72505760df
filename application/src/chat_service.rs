use async_trait::async_trait;
use domain::conversation;
use domain::models::{ConversationMessage, RetrievedMatch};
use futures::stream::BoxStream;
use shared::types::Result;
use tracing::{debug, info};

use crate::prompt;

/// A one-shot, non-restartable sequence of answer fragments. Concatenated in
/// emission order it yields the full answer.
pub type AnswerStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait Retriever: Send + Sync {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedMatch>>;
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn stream_chat(&self, messages: &[ConversationMessage]) -> Result<AnswerStream>;
}

/// The request orchestrator. One pass per request, no retries between steps:
/// validate, embed the active turn, retrieve context, compose the augmented
/// prompt, open the generation stream.
pub struct ChatService<E, R, G> {
    embedder: E,
    retriever: R,
    generator: G,
    top_k: usize,
}

impl<E: Embedder, R: Retriever, G: Generator> ChatService<E, R, G> {
    pub fn new(embedder: E, retriever: R, generator: G, top_k: usize) -> Self {
        Self {
            embedder,
            retriever,
            generator,
            top_k,
        }
    }

    /// Runs the pipeline for one conversation. Validation happens before any
    /// external call, so a malformed request never reaches an upstream
    /// service. Each step starts only after its predecessor's result is in;
    /// failures before the stream opens produce no fragments at all.
    pub async fn answer(&self, messages: &[ConversationMessage]) -> Result<AnswerStream> {
        let query = conversation::active_query(messages)?;

        let vector = self.embedder.embed(query).await?;
        debug!(dimensions = vector.len(), "query embedded");

        let matches = self.retriever.query(&vector, self.top_k).await?;
        info!(matches = matches.len(), "context retrieved");

        let prompt = prompt::compose_prompt(messages, &matches)?;
        self.generator.stream_chat(&prompt).await
    }
}
