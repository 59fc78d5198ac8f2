//! HTTP retriever for managed vector-index services.
//!
//! Talks to a hosted retrieval pipeline (LlamaCloud-style API): one POST
//! per query, bearer auth, JSON in and out. The index and embedding
//! internals live entirely on the service side.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use docquery_core::RetrievedPassage;

use crate::error::{RagError, Result};
use crate::retriever::Retriever;

/// The default base URL for the hosted retrieval API.
pub const DEFAULT_RETRIEVAL_URL: &str = "https://api.cloud.llamaindex.ai";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`HttpRetriever`].
#[derive(Debug, Clone)]
pub struct HttpRetrieverConfig {
    /// Bearer token for the service.
    pub api_key: String,
    /// Base URL of the retrieval API.
    pub base_url: String,
    /// Identifier of the hosted retrieval pipeline to query.
    pub pipeline_id: String,
    /// Per-request timeout; expiry follows the transport error path.
    pub timeout: Duration,
}

impl HttpRetrieverConfig {
    /// Create a config for the default hosted endpoint.
    pub fn new(api_key: impl Into<String>, pipeline_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_RETRIEVAL_URL.to_string(),
            pipeline_id: pipeline_id.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the retriever at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A [`Retriever`] backed by a hosted vector-index retrieval API.
///
/// Credentials and endpoints are supplied externally, via
/// [`HttpRetrieverConfig`] or [`HttpRetriever::from_env`].
#[derive(Debug)]
pub struct HttpRetriever {
    client: reqwest::Client,
    config: HttpRetrieverConfig,
}

impl HttpRetriever {
    /// Create a new retriever from the given config.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key or pipeline ID is empty,
    /// or if the HTTP client cannot be constructed.
    pub fn new(config: HttpRetrieverConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(RagError::Config("retrieval API key must not be empty".into()));
        }
        if config.pipeline_id.is_empty() {
            return Err(RagError::Config("retrieval pipeline ID must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a retriever from environment variables.
    ///
    /// Reads `DOCQUERY_RETRIEVAL_API_KEY` and `DOCQUERY_RETRIEVAL_PIPELINE`
    /// (required) and `DOCQUERY_RETRIEVAL_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DOCQUERY_RETRIEVAL_API_KEY").map_err(|_| {
            RagError::Config("DOCQUERY_RETRIEVAL_API_KEY environment variable not set".into())
        })?;
        let pipeline_id = std::env::var("DOCQUERY_RETRIEVAL_PIPELINE").map_err(|_| {
            RagError::Config("DOCQUERY_RETRIEVAL_PIPELINE environment variable not set".into())
        })?;
        let mut config = HttpRetrieverConfig::new(api_key, pipeline_id);
        if let Ok(url) = std::env::var("DOCQUERY_RETRIEVAL_URL") {
            config = config.with_base_url(url);
        }
        Self::new(config)
    }
}

// ── Retrieval API request/response types ───────────────────────────

#[derive(Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
    similarity_top_k: usize,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    retrieval_nodes: Vec<ScoredNode>,
}

#[derive(Deserialize)]
struct ScoredNode {
    node: Node,
    score: Option<f32>,
}

#[derive(Deserialize)]
struct Node {
    text: String,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

// ── Retriever implementation ───────────────────────────────────────

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        let url = format!(
            "{}/api/v1/pipelines/{}/retrieve",
            self.config.base_url.trim_end_matches('/'),
            self.config.pipeline_id
        );

        debug!(pipeline = %self.config.pipeline_id, top_k, "retrieving passages");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&RetrieveRequest { query, similarity_top_k: top_k })
            .send()
            .await
            .map_err(|e| {
                error!(pipeline = %self.config.pipeline_id, error = %e, "retrieval request failed");
                RagError::Retrieval { provider: "http".into(), message: e.to_string() }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(pipeline = %self.config.pipeline_id, %status, "retrieval API error");
            return Err(RagError::Retrieval {
                provider: "http".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let parsed: RetrieveResponse = response.json().await.map_err(|e| {
            error!(pipeline = %self.config.pipeline_id, error = %e, "failed to parse retrieval response");
            RagError::Retrieval {
                provider: "http".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(parsed
            .retrieval_nodes
            .into_iter()
            .enumerate()
            .map(|(i, scored)| RetrievedPassage {
                rank: i + 1,
                content: scored.node.text,
                metadata: scored.node.metadata,
                score: scored.score,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_credentials() {
        let err = HttpRetriever::new(HttpRetrieverConfig::new("", "pipe")).unwrap_err();
        assert!(matches!(err, RagError::Config(_)));

        let err = HttpRetriever::new(HttpRetrieverConfig::new("key", "")).unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }

    #[test]
    fn response_nodes_map_to_ranked_passages() {
        let body = serde_json::json!({
            "retrieval_nodes": [
                {"node": {"text": "first", "metadata": {"file_name": "a.pdf"}}, "score": 0.9},
                {"node": {"text": "second"}, "score": null}
            ]
        });
        let parsed: RetrieveResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.retrieval_nodes.len(), 2);
        assert_eq!(parsed.retrieval_nodes[0].node.text, "first");
        assert!(parsed.retrieval_nodes[1].node.metadata.is_empty());
        assert_eq!(parsed.retrieval_nodes[1].score, None);
    }
}
