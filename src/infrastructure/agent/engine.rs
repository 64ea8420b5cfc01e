//! Workflow engine: the step loop that drives one work item to a terminal state

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::agent::{AgentEngineConfig, AgentError, ContextAccumulator, FragmentIntent};
use crate::domain::approval::{ApprovalGateway, ApprovalRequest};
use crate::domain::reasoning::{NextAction, ReasoningGateway};
use crate::domain::retrieval::{RetrievalGateway, SourceFilter, pack_snippets};
use crate::domain::work_item::{ActionType, WorkItem, WorkItemRepository};
use crate::infrastructure::observability::{
    record_agent_step, record_approval_wait, record_workflow_outcome,
};

/// Orchestrates reasoning, retrieval and human approval for a work item.
///
/// Holds no per-run state. Each run gets its own context accumulator and
/// budget.
#[derive(Debug)]
pub struct AgentEngine {
    store: Arc<dyn WorkItemRepository>,
    reasoning: Arc<dyn ReasoningGateway>,
    retrieval: Arc<dyn RetrievalGateway>,
    approval: Arc<dyn ApprovalGateway>,
    config: AgentEngineConfig,
}

/// Per-run step accounting
#[derive(Debug)]
struct Budget {
    remaining: u32,
    refunds_left: u32,
}

impl Budget {
    fn new(max_steps: u32) -> Self {
        Self {
            remaining: max_steps,
            refunds_left: max_steps,
        }
    }

    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Restore the step allowance. Refunds already granted stay spent.
    fn reset(&mut self, max_steps: u32) {
        self.remaining = max_steps;
    }

    fn refund(&mut self) {
        if self.refunds_left > 0 {
            self.refunds_left -= 1;
            self.remaining += 1;
        }
    }
}

impl AgentEngine {
    pub fn new(
        store: Arc<dyn WorkItemRepository>,
        reasoning: Arc<dyn ReasoningGateway>,
        retrieval: Arc<dyn RetrievalGateway>,
        approval: Arc<dyn ApprovalGateway>,
        config: AgentEngineConfig,
    ) -> Self {
        Self {
            store,
            reasoning,
            retrieval,
            approval,
            config,
        }
    }

    /// Run the step loop and translate its failures into terminal states.
    ///
    /// `NoAnswerFound` and `HumanTakeover` end the item as `cancelled` with the
    /// error message as result. Store failures stop immediately, with nothing
    /// further written. Anything else ends the item as `failed`.
    #[instrument(skip(self, item, question), fields(work_item_id = %item.id()))]
    pub async fn run_pipeline(
        &self,
        mut item: WorkItem,
        question: &str,
    ) -> Result<WorkItem, AgentError> {
        match self.run(&mut item, question).await {
            Ok(()) => info!(state = %item.state(), "Workflow finished"),
            Err(AgentError::StoreUnavailable(message)) => {
                error!(error = %message, "Store unavailable, abandoning workflow");
                return Err(AgentError::StoreUnavailable(message));
            }
            Err(err) if err.is_terminating() => {
                info!(reason = %err, "Workflow cancelled");
                item.cancel(err.to_string())?;
                self.persist(&item).await?;
            }
            Err(err) => {
                error!(error = %err, "Workflow failed");
                item.fail(err.to_string())?;
                self.persist(&item).await?;
            }
        }

        record_workflow_outcome(item.state());
        Ok(item)
    }

    /// Drive `item` until it completes or the run fails.
    ///
    /// Every action and state change is persisted before the next external
    /// call, so a poller always sees the latest step.
    pub async fn run(&self, item: &mut WorkItem, question: &str) -> Result<(), AgentError> {
        let policy = self.config.retry;
        let mut context = ContextAccumulator::new();
        let mut budget = Budget::new(policy.max_steps);

        while budget.take() {
            debug!(remaining = budget.remaining, "Reasoning step");

            let decision = match self.reasoning.decide(question, &context.snapshot()).await {
                Ok(decision) => decision,
                Err(err) if err.is_validation() => {
                    warn!(error = %err, "Unparsable reasoning response");
                    self.record(item, ActionType::ValidationError, err.to_string())
                        .await?;
                    if !policy.parse_failure_consumes_step {
                        budget.refund();
                    }
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            match decision {
                NextAction::ContinueResearch { sub_query, sources } => {
                    self.research(item, &mut context, &sub_query, &sources)
                        .await?;
                }
                NextAction::ReadyToAnswer { reason } => {
                    self.record(item, ActionType::FormulateResponse, reason)
                        .await?;

                    let draft = match self
                        .reasoning
                        .draft_answer(question, &context.snapshot())
                        .await
                    {
                        Ok(draft) => draft,
                        Err(err) if err.is_validation() => {
                            warn!(error = %err, "Unusable draft");
                            self.record(item, ActionType::ValidationError, err.to_string())
                                .await?;
                            if !policy.parse_failure_consumes_step {
                                budget.refund();
                            }
                            continue;
                        }
                        Err(err) => return Err(err.into()),
                    };
                    self.record(item, ActionType::ReadyToAnswer, draft.clone())
                        .await?;

                    item.pause()?;
                    self.persist(item).await?;

                    let waited = Instant::now();
                    let outcome = self
                        .approval
                        .request_approval(ApprovalRequest::new(
                            item.id().clone(),
                            question,
                            draft.clone(),
                        ))
                        .await?;
                    record_approval_wait(waited.elapsed());

                    if outcome.approved {
                        item.resume()?;
                        self.record(item, ActionType::FinalAnswer, draft.clone())
                            .await?;
                        item.complete(draft)?;
                        self.persist(item).await?;
                        return Ok(());
                    }

                    if outcome.takeover {
                        return Err(AgentError::HumanTakeover);
                    }

                    let feedback = outcome.feedback.unwrap_or_default();
                    info!("Draft rejected, incorporating feedback");
                    item.resume()?;
                    context.add(FragmentIntent::DraftAnswer, draft);
                    context.add(FragmentIntent::AdminFeedback, feedback.clone());
                    self.record(item, ActionType::IncorporatingFeedback, feedback)
                        .await?;

                    if policy.reset_on_feedback {
                        budget.reset(policy.max_steps);
                    }
                }
            }
        }

        Err(AgentError::NoAnswerFound)
    }

    async fn research(
        &self,
        item: &mut WorkItem,
        context: &mut ContextAccumulator,
        sub_query: &str,
        sources: &SourceFilter,
    ) -> Result<(), AgentError> {
        let query = json!({ "query": sub_query, "sources": sources }).to_string();
        self.record(item, ActionType::RagQuery, query).await?;

        let snippets = self
            .retrieval
            .retrieve(sub_query, sources, self.config.retrieval_top_k)
            .await?;
        debug!(count = snippets.len(), "Retrieved snippets");

        let packed = pack_snippets(&snippets, self.config.context_char_limit);
        if packed.is_empty() {
            context.add(
                FragmentIntent::Note,
                format!("No results found for '{}'", sub_query),
            );
        } else {
            context.add(FragmentIntent::RagQuery, packed);
        }

        let raw = serde_json::to_string(&snippets)
            .map_err(|e| AgentError::Gateway(format!("Failed to encode snippets: {}", e)))?;
        self.record(item, ActionType::RagResult, raw).await
    }

    async fn record(
        &self,
        item: &mut WorkItem,
        action_type: ActionType,
        content: impl Into<String>,
    ) -> Result<(), AgentError> {
        item.record_action(action_type, content)?;
        record_agent_step(action_type);
        self.persist(item).await
    }

    async fn persist(&self, item: &WorkItem) -> Result<(), AgentError> {
        self.store
            .save(item)
            .await
            .map_err(|e| AgentError::StoreUnavailable(e.to_string()))
    }
}
