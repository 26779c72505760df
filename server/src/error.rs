use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shared::types::PipelineError;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Maps pipeline failures to HTTP responses. Only failures that happen
/// before streaming begins ever take this path; once the body is open, an
/// error terminates the stream instead.
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            PipelineError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            PipelineError::MalformedConversation(_) => {
                (StatusCode::BAD_REQUEST, "malformed_conversation")
            }
            PipelineError::UpstreamUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "upstream_unavailable")
            }
            PipelineError::StreamInterrupted(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "stream_interrupted")
            }
        };
        let body = ErrorBody {
            error: code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
