//! Structured outcomes of a pipeline run.

use serde::{Deserialize, Serialize};

use crate::document::RetrievedPassage;

/// One LLM-cited document/section pair with supporting explanation.
///
/// `document_name` is free text as produced by the model and may or may not
/// include a file extension; the resolver normalizes it before matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    /// Name of the cited document.
    pub document_name: String,
    /// Section identifier within the document.
    pub section_number: String,
    /// Multi-sentence explanation of what was found and why it is relevant.
    pub relevance_summary: String,
    /// Up to 3 verbatim quotes from the document.
    #[serde(default)]
    pub key_excerpts: Vec<String>,
    /// Brief note on technical significance, when the contract requests one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_context: Option<String>,
}

/// The tagged outcome of normalizing a completion response.
///
/// Exactly one shape applies per response. A completion that satisfies
/// neither the references shape nor the structured not-found signal is a
/// [`ParseFailure`](Answer::ParseFailure) — a distinct, reportable outcome,
/// never an error that aborts the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Answer {
    /// The model grounded its answer in one or more cited references.
    References {
        /// Cited references, in model order. Non-empty.
        references: Vec<Reference>,
    },
    /// The model explicitly reported that no relevant content exists.
    NotFound {
        /// The model's not-found message.
        message: String,
    },
    /// The completion matched neither expected shape.
    ParseFailure {
        /// The raw completion text, preserved for diagnosis.
        raw: String,
    },
}

impl Answer {
    /// The cited references, when this outcome carries any.
    pub fn references(&self) -> &[Reference] {
        match self {
            Answer::References { references } => references,
            _ => &[],
        }
    }
}

/// What the pipeline orchestrator always returns for a completed run.
///
/// The raw passages travel alongside the structured answer so callers can
/// offer an advanced view of what the index actually returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// The normalized answer.
    pub answer: Answer,
    /// The passages the answer was grounded in, in retrieval order.
    pub passages: Vec<RetrievedPassage>,
}
