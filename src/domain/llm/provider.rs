use std::fmt::Debug;

use async_trait::async_trait;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Chat-completion backend (OpenAI or any compatible server)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies with queued contents in order and keeps every request it saw
    #[derive(Debug)]
    pub struct MockLlmProvider {
        name: &'static str,
        replies: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<LlmRequest>>,
        error: Option<String>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                replies: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                error: None,
            }
        }

        pub fn with_reply(self, content: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push_back(content.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let content = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| DomainError::provider(self.name, "No mock response configured"))?;

            Ok(LlmResponse::new("mock-1", model, Message::assistant(content)))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
