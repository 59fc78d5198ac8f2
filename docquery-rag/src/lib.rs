//! # docquery-rag
//!
//! The retrieval-grounded answer pipeline.
//!
//! Given a free-text question, the [`QueryPipeline`]:
//!
//! 1. fetches the top-K relevant passages from a [`Retriever`],
//! 2. assembles them into a bounded, source-delimited context block,
//! 3. issues a strict-contract prompt to a
//!    [`CompletionModel`](docquery_model::CompletionModel),
//! 4. normalizes the completion into an [`Answer`](docquery_core::Answer),
//!    tolerating code-fence wrapping and signaling parse failures as data.
//!
//! A separate [`DocumentStore`] maps each cited document name back to a file
//! in a local PDF tree using an exact-then-partial matching policy.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docquery_rag::{QueryPipeline, QueryConfig, StaticRetriever, DocumentStore};
//!
//! let pipeline = QueryPipeline::builder()
//!     .config(QueryConfig::default())
//!     .retriever(Arc::new(retriever))
//!     .model(Arc::new(model))
//!     .build()?;
//!
//! let outcome = pipeline.answer("What covers stress corrosion cracking?").await?;
//! let store = DocumentStore::open("./Data")?;
//! let resolved = store.resolve_all(outcome.answer.references());
//! ```

pub mod context;
pub mod normalize;
pub mod prompt;
pub mod resolver;
pub mod retriever;

mod config;
mod error;
mod pipeline;
mod remote;

pub use config::{QueryConfig, QueryConfigBuilder};
pub use context::assemble_context;
pub use error::{RagError, Result};
pub use normalize::parse_completion;
pub use pipeline::{QueryPipeline, QueryPipelineBuilder};
pub use prompt::{NOT_FOUND_MESSAGE, PromptContract};
pub use remote::{DEFAULT_RETRIEVAL_URL, HttpRetriever, HttpRetrieverConfig};
pub use resolver::DocumentStore;
pub use retriever::{Retriever, StaticRetriever};
