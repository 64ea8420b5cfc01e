//! Reasoning gateway backed by a chat-completion model

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::prompts::{DECIDE_SYSTEM_PROMPT, DRAFT_SYSTEM_PROMPT, render_user_prompt};
use crate::domain::DomainError;
use crate::domain::agent::ContextFragment;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::reasoning::{NextAction, ReasoningGateway};
use crate::domain::retrieval::{SourceFilter, SourceKind};

#[derive(Debug)]
pub struct LlmReasoningGateway {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
}

impl LlmReasoningGateway {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Decision as the model writes it; sources are free strings until validated
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum RawDecision {
    ContinueResearch {
        sub_query: String,
        #[serde(default)]
        sources: Vec<String>,
    },
    ReadyToAnswer {
        reason: String,
    },
}

/// Slice out the outermost JSON object, tolerating markdown fences
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn parse_decision(response: &str) -> Result<NextAction, DomainError> {
    let json = extract_json(response).unwrap_or(response);

    let raw: RawDecision = serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, response, "Unparsable reasoning decision");
        DomainError::validation(format!("Invalid decision format: {}", e))
    })?;

    match raw {
        RawDecision::ContinueResearch { sub_query, sources } => {
            if sub_query.trim().is_empty() {
                return Err(DomainError::validation("Decision has an empty sub_query"));
            }
            let sources = sources
                .iter()
                .map(|s| s.parse::<SourceKind>())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NextAction::ContinueResearch {
                sub_query: sub_query.trim().to_string(),
                sources: SourceFilter::only(sources),
            })
        }
        RawDecision::ReadyToAnswer { reason } => Ok(NextAction::ReadyToAnswer { reason }),
    }
}

#[async_trait]
impl ReasoningGateway for LlmReasoningGateway {
    async fn decide(
        &self,
        question: &str,
        context: &[ContextFragment],
    ) -> Result<NextAction, DomainError> {
        let request = LlmRequest::builder()
            .system(DECIDE_SYSTEM_PROMPT)
            .user(render_user_prompt(question, context))
            .temperature(self.temperature)
            .max_tokens(300)
            .json_output()
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let decision = parse_decision(response.content())?;

        debug!(model = %self.model, ?decision, "Reasoning decision");
        Ok(decision)
    }

    async fn draft_answer(
        &self,
        question: &str,
        context: &[ContextFragment],
    ) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .system(DRAFT_SYSTEM_PROMPT)
            .user(render_user_prompt(question, context))
            .temperature(self.temperature)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let answer = response.content().trim();

        if answer.is_empty() {
            return Err(DomainError::validation("Model returned an empty answer"));
        }

        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{LlmResponseFormat, MockLlmProvider};

    fn gateway(provider: MockLlmProvider) -> (LlmReasoningGateway, Arc<MockLlmProvider>) {
        let provider = Arc::new(provider);
        (
            LlmReasoningGateway::new(provider.clone(), "gpt-4o-mini"),
            provider,
        )
    }

    #[tokio::test]
    async fn test_decide_continue_research() {
        let (gateway, provider) = gateway(MockLlmProvider::new("mock").with_reply(
            r#"{"action":"continue_research","sub_query":"rate limits","sources":["docs"]}"#,
        ));

        let decision = gateway.decide("How do rate limits work?", &[]).await.unwrap();
        assert_eq!(
            decision,
            NextAction::ContinueResearch {
                sub_query: "rate limits".into(),
                sources: SourceFilter::only([SourceKind::Docs]),
            }
        );

        let request = &provider.requests()[0];
        assert_eq!(request.response_format, LlmResponseFormat::JsonObject);
        assert!(request.messages[1].content.contains("How do rate limits work?"));
    }

    #[tokio::test]
    async fn test_decide_accepts_fenced_json() {
        let (gateway, _) = gateway(MockLlmProvider::new("mock").with_reply(
            "```json\n{\"action\": \"ready_to_answer\", \"reason\": \"docs cover it\"}\n```",
        ));

        let decision = gateway.decide("q", &[]).await.unwrap();
        assert_eq!(
            decision,
            NextAction::ReadyToAnswer {
                reason: "docs cover it".into()
            }
        );
    }

    #[tokio::test]
    async fn test_decide_unparsable_is_validation_error() {
        let (gateway, _) = gateway(MockLlmProvider::new("mock").with_reply("I think I know!"));

        let err = gateway.decide("q", &[]).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_decide_unknown_source_is_validation_error() {
        let (gateway, _) = gateway(MockLlmProvider::new("mock").with_reply(
            r#"{"action":"continue_research","sub_query":"x","sources":["wiki"]}"#,
        ));

        assert!(gateway.decide("q", &[]).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_validation() {
        let (gateway, _) = gateway(MockLlmProvider::new("mock").with_error("503"));

        let err = gateway.decide("q", &[]).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_draft_answer_trims_and_rejects_empty() {
        let (gateway, _) = gateway(
            MockLlmProvider::new("mock")
                .with_reply("  X is a thing.\n")
                .with_reply("   "),
        );

        assert_eq!(gateway.draft_answer("q", &[]).await.unwrap(), "X is a thing.");
        assert!(gateway.draft_answer("q", &[]).await.unwrap_err().is_validation());
    }
}
