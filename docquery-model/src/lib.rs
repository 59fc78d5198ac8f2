//! # docquery-model
//!
//! LLM completion clients for the DocQuery pipeline.
//!
//! The pipeline needs exactly one thing from a model: send one
//! non-streaming chat completion request and get the text back. This crate
//! provides:
//!
//! - [`CompletionModel`] — the trait the pipeline programs against
//! - [`ChatClient`] — an OpenAI-compatible `/v1/chat/completions` client
//! - [`MockCompletion`] — a scripted model for tests
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use docquery_model::{ChatClient, ChatConfig, CompletionModel, CompletionRequest};
//!
//! let client = ChatClient::new(ChatConfig::new("api-key", "gpt-4o"))?;
//! let request = CompletionRequest::user("What does GL 96-06 cover?")
//!     .with_system_instruction("Answer only from the given context.");
//! let text = client.complete(&request).await?;
//! ```

mod chat;
mod completion;
mod error;
mod mock;

pub use chat::{ChatClient, ChatConfig, DEFAULT_CHAT_URL};
pub use completion::{CompletionModel, CompletionRequest};
pub use error::{ModelError, Result};
pub use mock::MockCompletion;
