//! Query pipeline orchestrator.
//!
//! The [`QueryPipeline`] sequences retrieve → assemble → prompt → complete →
//! normalize into a single [`answer`](QueryPipeline::answer) operation.
//! Construct one via [`QueryPipeline::builder()`].

use std::sync::Arc;

use tracing::{error, info};

use docquery_core::{Answer, QueryOutcome};
use docquery_model::{CompletionModel, CompletionRequest};

use crate::config::QueryConfig;
use crate::context::assemble_context;
use crate::error::{RagError, Result};
use crate::normalize::parse_completion;
use crate::retriever::Retriever;

/// The retrieval-grounded answer pipeline.
///
/// `answer()` always completes and always yields something displayable:
/// expected conditions — empty retrieval, completion errors, parse
/// failures, the model's explicit not-found signal — are values inside the
/// returned [`QueryOutcome`], never panics or aborts. Only a failed
/// retrieval call (the service being unreachable) returns `Err`.
pub struct QueryPipeline {
    config: QueryConfig,
    retriever: Arc<dyn Retriever>,
    model: Arc<dyn CompletionModel>,
}

impl QueryPipeline {
    /// Create a new [`QueryPipelineBuilder`].
    pub fn builder() -> QueryPipelineBuilder {
        QueryPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Answer a free-text question against the indexed corpus.
    ///
    /// Returns the normalized answer together with the raw retrieved
    /// passages, for callers that want to display what the index returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Retrieval`] only when the retrieval call itself
    /// fails. A completion failure is mapped to
    /// [`Answer::ParseFailure`] carrying an `"Error: <detail>"` sentinel,
    /// so the pipeline's structured-outcome contract holds.
    pub async fn answer(&self, query: &str) -> Result<QueryOutcome> {
        // 1. Retrieve the top-K passages
        let passages =
            self.retriever.retrieve(query, self.config.top_k).await.inspect_err(|e| {
                error!(retriever = self.retriever.name(), error = %e, "retrieval failed");
            })?;

        // 2. Assemble the bounded context block
        let context = assemble_context(&passages);

        // 3. Issue the strict-contract prompt at the configured temperature
        let contract = self.config.contract;
        let request = CompletionRequest::user(contract.user_message(&context, query))
            .with_system_instruction(contract.system_instruction())
            .with_temperature(self.config.temperature);

        // 4. Complete and normalize. A transport or API failure becomes the
        //    error-sentinel raw text, which classifies as a parse failure.
        let answer = match self.model.complete(&request).await {
            Ok(raw) => parse_completion(&raw),
            Err(e) => {
                error!(model = self.model.name(), error = %e, "completion failed");
                Answer::ParseFailure { raw: format!("Error: {e}") }
            }
        };

        info!(
            query_len = query.len(),
            passage_count = passages.len(),
            outcome = answer_variant(&answer),
            "query completed"
        );

        Ok(QueryOutcome { answer, passages })
    }
}

fn answer_variant(answer: &Answer) -> &'static str {
    match answer {
        Answer::References { .. } => "references",
        Answer::NotFound { .. } => "not_found",
        Answer::ParseFailure { .. } => "parse_failure",
    }
}

/// Builder for constructing a [`QueryPipeline`].
///
/// `retriever` and `model` are required; `config` defaults to
/// [`QueryConfig::default()`].
#[derive(Default)]
pub struct QueryPipelineBuilder {
    config: Option<QueryConfig>,
    retriever: Option<Arc<dyn Retriever>>,
    model: Option<Arc<dyn CompletionModel>>,
}

impl QueryPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QueryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the retrieval backend.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the completion model.
    pub fn model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Build the [`QueryPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `retriever` or `model` is missing.
    pub fn build(self) -> Result<QueryPipeline> {
        let retriever = self
            .retriever
            .ok_or_else(|| RagError::Config("retriever is required".to_string()))?;
        let model = self.model.ok_or_else(|| RagError::Config("model is required".to_string()))?;

        Ok(QueryPipeline { config: self.config.unwrap_or_default(), retriever, model })
    }
}
