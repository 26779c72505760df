use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use domain::models::ConversationMessage;
use futures::StreamExt;
use serde::Serialize;
use shared::telemetry::Telemetry;
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/api/chat", post(post_chat))
        .with_state(state)
}

async fn get_health() -> impl IntoResponse {
    #[derive(Serialize)]
    struct Health {
        status: &'static str,
        version: &'static str,
    }

    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Runs the answer pipeline and relays the generation stream as a raw UTF-8
/// body. A failure before the first fragment maps to an HTTP error response;
/// a mid-stream failure aborts the body without retracting delivered text.
/// Dropping the body (client disconnect) drops the generation stream and
/// releases the upstream call.
async fn post_chat(
    State(state): State<AppState>,
    Json(conversation): Json<Vec<ConversationMessage>>,
) -> Result<impl IntoResponse, ApiError> {
    let telemetry = Telemetry::new();
    info!(turns = conversation.len(), "chat request received");

    let stream = state.service.answer(&conversation).await.map_err(|e| {
        error!(error = %e, "pipeline failed before streaming");
        ApiError(e)
    })?;
    info!(
        elapsed_ms = telemetry.elapsed_ms() as u64,
        "pipeline ready, streaming answer"
    );

    let body = Body::from_stream(stream.map(|fragment| fragment.map(Bytes::from)));
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}
