//! Shared data model for DocQuery.
//!
//! This crate defines the plain data types that flow through the
//! retrieval-grounded answer pipeline:
//!
//! - [`RetrievedPassage`] — one ranked chunk returned by the retrieval service
//! - [`Reference`] — one LLM-cited document/section pair
//! - [`Answer`] — the tagged outcome of normalizing a completion
//! - [`QueryOutcome`] — what a completed pipeline run always yields
//! - [`ResolvedDocument`] — a reference mapped to a local file (or not)
//!
//! All values are created fresh per query and discarded at the end of the
//! request; nothing here persists across queries.

mod answer;
mod document;
mod error;

pub use answer::{Answer, QueryOutcome, Reference};
pub use document::{ResolvedDocument, RetrievedPassage, format_size};
pub use error::CoreError;
