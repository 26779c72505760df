use thiserror::Error;

/// Failure taxonomy for one pass through the answer pipeline.
///
/// An empty retrieval result is not represented here: the index having no
/// matches for a query is a valid outcome and the pipeline continues with an
/// empty context block.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed or empty request. User-correctable, surfaced before any
    /// external call is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The conversation does not end with a user turn.
    #[error("malformed conversation: {0}")]
    MalformedConversation(String),

    /// An external service was unreachable or errored before streaming
    /// started. No partial output has been produced.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The generation stream failed after at least one fragment may have
    /// been delivered. Already-emitted fragments remain valid.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}

impl PipelineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn upstream(service: &str, err: impl std::fmt::Display) -> Self {
        Self::UpstreamUnavailable(format!("{service}: {err}"))
    }
}
