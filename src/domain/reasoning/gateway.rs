//! Reasoning gateway trait

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::agent::ContextFragment;
use crate::domain::retrieval::SourceFilter;

/// What the reasoning component wants to do next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextAction {
    /// Search the knowledge store before answering
    ContinueResearch {
        sub_query: String,
        #[serde(default)]
        sources: SourceFilter,
    },
    /// Enough context has been gathered
    ReadyToAnswer { reason: String },
}

/// Black-box reasoning over a question and the accumulated context.
///
/// Implementations fail with [`DomainError::Validation`] when the underlying
/// response cannot be parsed; any other error is treated as a transport failure.
#[async_trait]
pub trait ReasoningGateway: Send + Sync + Debug {
    async fn decide(
        &self,
        question: &str,
        context: &[ContextFragment],
    ) -> Result<NextAction, DomainError>;

    async fn draft_answer(
        &self,
        question: &str,
        context: &[ContextFragment],
    ) -> Result<String, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back scripted decisions and drafts, then falls back to fixed ones
    #[derive(Debug)]
    pub struct ScriptedReasoningGateway {
        decisions: Mutex<VecDeque<Result<NextAction, DomainError>>>,
        fallback: NextAction,
        drafts: Mutex<VecDeque<Result<String, DomainError>>>,
        decide_contexts: Mutex<Vec<Vec<ContextFragment>>>,
        draft_calls: Mutex<usize>,
    }

    impl ScriptedReasoningGateway {
        /// Every call to `decide` returns `fallback` unless scripted otherwise
        pub fn new(fallback: NextAction) -> Self {
            Self {
                decisions: Mutex::new(VecDeque::new()),
                fallback,
                drafts: Mutex::new(VecDeque::new()),
                decide_contexts: Mutex::new(Vec::new()),
                draft_calls: Mutex::new(0),
            }
        }

        pub fn always_ready() -> Self {
            Self::new(NextAction::ReadyToAnswer {
                reason: "the question is answerable".to_string(),
            })
        }

        pub fn always_research() -> Self {
            Self::new(NextAction::ContinueResearch {
                sub_query: "more context".to_string(),
                sources: SourceFilter::all(),
            })
        }

        pub fn then_decide(self, decision: Result<NextAction, DomainError>) -> Self {
            self.decisions.lock().unwrap().push_back(decision);
            self
        }

        pub fn then_draft(self, draft: Result<String, DomainError>) -> Self {
            self.drafts.lock().unwrap().push_back(draft);
            self
        }

        pub fn decide_calls(&self) -> usize {
            self.decide_contexts.lock().unwrap().len()
        }

        pub fn draft_calls(&self) -> usize {
            *self.draft_calls.lock().unwrap()
        }

        /// Context passed to each `decide` call, in call order
        pub fn decide_contexts(&self) -> Vec<Vec<ContextFragment>> {
            self.decide_contexts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReasoningGateway for ScriptedReasoningGateway {
        async fn decide(
            &self,
            _question: &str,
            context: &[ContextFragment],
        ) -> Result<NextAction, DomainError> {
            self.decide_contexts.lock().unwrap().push(context.to_vec());
            self.decisions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(self.fallback.clone()))
        }

        async fn draft_answer(
            &self,
            _question: &str,
            _context: &[ContextFragment],
        ) -> Result<String, DomainError> {
            let call = {
                let mut calls = self.draft_calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            self.drafts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(format!("draft {}", call)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_action_wire_shape() {
        let action: NextAction = serde_json::from_str(
            r#"{"action":"continue_research","sub_query":"pricing","sources":["docs"]}"#,
        )
        .unwrap();
        match action {
            NextAction::ContinueResearch { sub_query, sources } => {
                assert_eq!(sub_query, "pricing");
                assert!(!sources.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }

        let action: NextAction =
            serde_json::from_str(r#"{"action":"ready_to_answer","reason":"docs cover it"}"#)
                .unwrap();
        assert_eq!(
            action,
            NextAction::ReadyToAnswer {
                reason: "docs cover it".to_string()
            }
        );
    }
}
