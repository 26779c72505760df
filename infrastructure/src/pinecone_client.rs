use domain::models::RetrievedMatch;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::{PipelineError, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievedMatch>,
}

#[derive(Clone)]
pub struct PineconeClient {
    client: Arc<Client>,
    api_key: String,
    index_host: String,
    namespace: String,
}

impl PineconeClient {
    pub fn new(
        api_key: impl Into<String>,
        index_host: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        let index_host: String = index_host.into();
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.into(),
            index_host: index_host.trim_end_matches('/').to_string(),
            namespace: namespace.into(),
        }
    }

    /// Top-K nearest neighbors for a query vector, in the index's own
    /// similarity order. Metadata inclusion is always requested here since
    /// downstream composition depends on it. An index with no vectors comes
    /// back as an empty list, which is a valid result.
    pub async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedMatch>> {
        let url = format!("{}/query", self.index_host);
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: &self.namespace,
        };
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("vector index", e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::UpstreamUnavailable(format!(
                "vector index returned {status}: {body}"
            )));
        }
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream("vector index", e))?;
        debug!(matches = parsed.matches.len(), "vector index query complete");
        Ok(parsed.matches)
    }
}
