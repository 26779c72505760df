mod error;
mod routes;
mod state;

use anyhow::Context;
use application::chat_service::ChatService;
use clap::Parser;
use infrastructure::config::Config;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::pinecone_client::PineconeClient;
use state::AppState;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "profscout",
    about = "Streaming RAG service for instructor recommendations"
)]
struct Args {
    /// Address to bind the HTTP listener on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    // Clients are constructed once at startup and shared across requests.
    let openai = OpenAiClient::new(
        &config.openai_api_key,
        &config.openai_base_url,
        &config.embedding_model,
        &config.chat_model,
    );
    let pinecone = PineconeClient::new(
        &config.pinecone_api_key,
        &config.pinecone_index_host,
        &config.pinecone_namespace,
    );
    let service = ChatService::new(openai.clone(), pinecone, openai, config.top_k);
    let state = AppState {
        service: Arc::new(service),
    };

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
