//! Retrieval gateway trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{RetrievedSnippet, SourceFilter};
use crate::domain::DomainError;

/// Black-box search over the knowledge store
#[async_trait]
pub trait RetrievalGateway: Send + Sync + Debug {
    /// Ranked snippets for `query`, most relevant first, at most `top_k`
    async fn retrieve(
        &self,
        query: &str,
        sources: &SourceFilter,
        top_k: u32,
    ) -> Result<Vec<RetrievedSnippet>, DomainError>;

    fn gateway_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Returns the same snippets for every query and records the queries
    #[derive(Debug, Default)]
    pub struct MockRetrievalGateway {
        snippets: Vec<RetrievedSnippet>,
        queries: Mutex<Vec<(String, SourceFilter)>>,
        error: Option<String>,
    }

    impl MockRetrievalGateway {
        pub fn new(snippets: Vec<RetrievedSnippet>) -> Self {
            Self {
                snippets,
                ..Self::default()
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn queries(&self) -> Vec<(String, SourceFilter)> {
            self.queries.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RetrievalGateway for MockRetrievalGateway {
        async fn retrieve(
            &self,
            query: &str,
            sources: &SourceFilter,
            top_k: u32,
        ) -> Result<Vec<RetrievedSnippet>, DomainError> {
            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), sources.clone()));

            if let Some(error) = &self.error {
                return Err(DomainError::provider("mock", error.clone()));
            }

            Ok(self
                .snippets
                .iter()
                .take(top_k as usize)
                .cloned()
                .collect())
        }

        fn gateway_name(&self) -> &'static str {
            "mock"
        }
    }
}
