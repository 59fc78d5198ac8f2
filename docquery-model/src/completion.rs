//! Completion trait and request type.

use async_trait::async_trait;

use crate::error::Result;

/// One completion request: a role, a message body, and an optional system
/// instruction that is sent as the first message when present.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Role of the message author (typically `"user"`).
    pub role: String,
    /// The message body.
    pub content: String,
    /// Optional system instruction, sent first when set.
    pub system_instruction: Option<String>,
    /// Optional sampling temperature; when set it overrides the client's
    /// configured value for this request.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a request with the given role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            system_instruction: None,
            temperature: None,
        }
    }

    /// Create a `user`-role request.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Attach a system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Override the client's configured sampling temperature for this
    /// request.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A model that produces one text completion per request.
///
/// Implementations send exactly one request; they do not retry, stream, or
/// cache. Transport and API failures surface as [`ModelError`](crate::ModelError)
/// values for the caller to map into its own outcome taxonomy.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Request a single text completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// A short name identifying the backing model, for logging.
    fn name(&self) -> &str;
}
