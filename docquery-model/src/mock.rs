//! Scripted completion model for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::completion::{CompletionModel, CompletionRequest};
use crate::error::{ModelError, Result};

type ReplyFn = Box<dyn Fn(&CompletionRequest) -> Result<String> + Send + Sync>;

enum Behavior {
    Fixed(String),
    Script(Mutex<VecDeque<String>>),
    Failing(String),
    Dynamic(ReplyFn),
}

/// A [`CompletionModel`] that replays scripted responses.
///
/// Records every request it receives so tests can assert on the prompt
/// that actually reached the model.
pub struct MockCompletion {
    behavior: Behavior,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletion {
    /// A mock that returns the same text for every request.
    pub fn with_reply(text: impl Into<String>) -> Self {
        Self { behavior: Behavior::Fixed(text.into()), requests: Mutex::new(Vec::new()) }
    }

    /// A mock that pops replies in sequence and errors once exhausted.
    pub fn with_script(replies: impl IntoIterator<Item = String>) -> Self {
        Self {
            behavior: Behavior::Script(Mutex::new(replies.into_iter().collect())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A mock whose every request fails at the transport layer.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { behavior: Behavior::Failing(message.into()), requests: Mutex::new(Vec::new()) }
    }

    /// A mock that computes its reply from the incoming request.
    pub fn with_fn(f: impl Fn(&CompletionRequest) -> Result<String> + Send + Sync + 'static) -> Self {
        Self { behavior: Behavior::Dynamic(Box::new(f)), requests: Mutex::new(Vec::new()) }
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl CompletionModel for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().expect("mock lock poisoned").push(request.clone());

        match &self.behavior {
            Behavior::Fixed(text) => Ok(text.clone()),
            Behavior::Script(queue) => queue
                .lock()
                .expect("mock lock poisoned")
                .pop_front()
                .ok_or_else(|| ModelError::EmptyResponse("mock script exhausted".into())),
            Behavior::Failing(message) => Err(ModelError::Transport(message.clone())),
            Behavior::Dynamic(f) => f(request),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_mock_repeats_and_records() {
        let mock = MockCompletion::with_reply("hello");
        let request = CompletionRequest::user("q1");

        assert_eq!(mock.complete(&request).await.unwrap(), "hello");
        assert_eq!(mock.complete(&request).await.unwrap(), "hello");
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn script_errors_once_exhausted() {
        let mock = MockCompletion::with_script(["a".to_string()]);
        let request = CompletionRequest::user("q");

        assert_eq!(mock.complete(&request).await.unwrap(), "a");
        assert!(matches!(
            mock.complete(&request).await,
            Err(ModelError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn failing_mock_surfaces_transport_error() {
        let mock = MockCompletion::failing("connection refused");
        let err = mock.complete(&CompletionRequest::user("q")).await.unwrap_err();
        assert!(matches!(err, ModelError::Transport(_)));
    }
}
