//! Wires the concrete service clients into the pipeline seams.

use async_trait::async_trait;
use domain::models::{ConversationMessage, RetrievedMatch};
use infrastructure::openai_client::OpenAiClient;
use infrastructure::pinecone_client::PineconeClient;
use shared::types::Result;

use crate::chat_service::{AnswerStream, Embedder, Generator, Retriever};

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        OpenAiClient::embed(self, text).await
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn stream_chat(&self, messages: &[ConversationMessage]) -> Result<AnswerStream> {
        self.chat_stream(messages).await
    }
}

#[async_trait]
impl Retriever for PineconeClient {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedMatch>> {
        PineconeClient::query(self, vector, top_k).await
    }
}
