//! Data types for retrieved passages and resolved documents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::answer::Reference;

/// One passage returned by the retrieval service for a query.
///
/// `rank` is the passage's 1-based position in the service's relevance
/// ordering (descending). `metadata` carries whatever provenance the index
/// stored alongside the chunk; a `BTreeMap` keeps its rendering order stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedPassage {
    /// 1-based position in the retrieval ordering.
    pub rank: usize,
    /// The raw text content of the passage.
    pub content: String,
    /// Key-value provenance metadata from the index.
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Relevance score, when the service reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A [`Reference`] mapped against the local document store.
///
/// `path` is `None` when no matching file exists in the store. That is a
/// normal, expected outcome — the rest of the result set stays usable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedDocument {
    /// The reference as cited by the LLM.
    pub reference: Reference,
    /// Path of the matching file, if one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Size of the matching file in bytes, when readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Format a byte count for display: one decimal KB below 1 MiB, two
/// decimal MB above.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
