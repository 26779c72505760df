use anyhow::Context;
use dotenvy::dotenv;
use std::env;

pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub pinecone_api_key: String,
    pub pinecone_index_host: String,
    pub pinecone_namespace: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub top_k: usize,
}

impl Config {
    /// Loads configuration once at startup. Missing credentials are a
    /// startup error, not something the request pipeline ever sees.
    pub fn load() -> anyhow::Result<Self> {
        dotenv().ok();
        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            pinecone_api_key: env::var("PINECONE_API_KEY").context("PINECONE_API_KEY is not set")?,
            pinecone_index_host: env::var("PINECONE_INDEX_HOST")
                .context("PINECONE_INDEX_HOST is not set")?,
            pinecone_namespace: env::var("PINECONE_NAMESPACE")
                .unwrap_or_else(|_| "ns1".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            top_k: env::var("TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        })
    }
}
