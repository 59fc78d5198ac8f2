//! Retriever trait and in-memory implementation.

use async_trait::async_trait;

use docquery_core::RetrievedPassage;

use crate::error::Result;

/// A service returning ranked, semantically relevant passages for a query.
///
/// The retrieval internals (embedding, indexing, similarity metric) are the
/// provider's business; the pipeline only depends on this interface.
/// Returned passages carry 1-based ranks in the provider's relevance order,
/// most relevant first.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Fetch the `top_k` most relevant passages for `query`.
    ///
    /// An empty result is a normal outcome (nothing indexed matched), not
    /// an error.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>>;

    /// A short name identifying the provider, for logging.
    fn name(&self) -> &str {
        "retriever"
    }
}

/// An in-memory retriever serving a fixed passage set.
///
/// Suitable for tests and offline development. Passages are returned in
/// stored order, re-ranked 1..=N and truncated to `top_k`; no similarity
/// scoring is performed.
#[derive(Debug, Default)]
pub struct StaticRetriever {
    passages: Vec<RetrievedPassage>,
}

impl StaticRetriever {
    /// Create a retriever serving the given passages in order.
    pub fn new(passages: Vec<RetrievedPassage>) -> Self {
        Self { passages }
    }

    /// Create a retriever that always returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn retrieve(&self, _query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        Ok(self
            .passages
            .iter()
            .take(top_k)
            .cloned()
            .enumerate()
            .map(|(i, mut passage)| {
                passage.rank = i + 1;
                passage
            })
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}
