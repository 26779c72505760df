use application::chat_service::ChatService;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::pinecone_client::PineconeClient;
use std::sync::Arc;

pub type Pipeline = ChatService<OpenAiClient, PineconeClient, OpenAiClient>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Pipeline>,
}
