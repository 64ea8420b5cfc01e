//! Agent service: starts workflows in the background and answers polls

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, Span, error, info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::work_item::{InitialInput, WorkItem, WorkItemId, WorkItemRepository};
use crate::infrastructure::agent::AgentEngine;
use crate::infrastructure::observability::record_workflow_started;

/// Error recorded on items left in flight by a previous process
pub const INTERRUPTED_ERROR: &str = "interrupted by restart";

/// Result of submitting a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A workflow is running in the background
    Started {
        id: WorkItemId,
        title: Option<String>,
    },
    /// The classifier marked the input as not worth answering
    Ignored { reason: String },
}

/// Trait for the agent service (for dynamic dispatch in AppState)
#[async_trait]
pub trait AgentServiceTrait: Send + Sync + Debug {
    /// Create a work item and run its workflow in the background
    async fn start(&self, input: InitialInput) -> Result<StartOutcome, DomainError>;

    /// `None` while in flight, the user-facing result once terminal
    async fn poll(&self, id: &str) -> Result<Option<String>, DomainError>;

    /// Full work item including its audit trail
    async fn get(&self, id: &str) -> Result<WorkItem, DomainError>;

    /// Every work item, newest first
    async fn list(&self) -> Result<Vec<WorkItem>, DomainError>;

    /// Mark items left `running` or `paused` by a previous process as failed
    async fn recover_interrupted(&self) -> Result<usize, DomainError>;
}

#[derive(Debug)]
pub struct AgentService {
    repository: Arc<dyn WorkItemRepository>,
    engine: Arc<AgentEngine>,
}

impl AgentService {
    pub fn new(repository: Arc<dyn WorkItemRepository>, engine: Arc<AgentEngine>) -> Self {
        Self { repository, engine }
    }

    /// Run a workflow to its end on the current task
    #[instrument(skip(self, input))]
    pub async fn run_to_completion(&self, input: InitialInput) -> Result<WorkItem, DomainError> {
        let question = validated_question(&input)?;
        let item = self.repository.create(input).await?;
        record_workflow_started();

        Ok(self.engine.run_pipeline(item, &question).await?)
    }

    fn parse_id(&self, id: &str) -> Result<WorkItemId, DomainError> {
        WorkItemId::new(id).map_err(DomainError::from)
    }
}

fn validated_question(input: &InitialInput) -> Result<String, DomainError> {
    let question = input.question();
    if question.is_empty() {
        return Err(DomainError::validation("Question must not be empty"));
    }
    Ok(question)
}

#[async_trait]
impl AgentServiceTrait for AgentService {
    #[instrument(skip(self, input), fields(messages = input.messages.len()))]
    async fn start(&self, input: InitialInput) -> Result<StartOutcome, DomainError> {
        if let Some(reason) = input
            .classification
            .as_ref()
            .and_then(|c| c.ignore_reason())
        {
            info!(reason = %reason, "Input ignored by classifier");
            return Ok(StartOutcome::Ignored {
                reason: reason.to_string(),
            });
        }

        let question = validated_question(&input)?;
        let title = input
            .classification
            .as_ref()
            .and_then(|c| c.title())
            .map(str::to_string);

        let item = self.repository.create(input).await?;
        let id = item.id().clone();
        record_workflow_started();
        info!(work_item_id = %id, "Workflow started");

        let engine = self.engine.clone();
        tokio::spawn(
            async move {
                if let Err(e) = engine.run_pipeline(item, &question).await {
                    error!(error = %e, "Workflow aborted");
                }
            }
            .instrument(Span::current()),
        );

        Ok(StartOutcome::Started { id, title })
    }

    #[instrument(skip(self))]
    async fn poll(&self, id: &str) -> Result<Option<String>, DomainError> {
        let id = self.parse_id(id)?;
        Ok(self.repository.load(&id).await?.poll_result())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<WorkItem, DomainError> {
        let id = self.parse_id(id)?;
        self.repository.load(&id).await
    }

    async fn list(&self) -> Result<Vec<WorkItem>, DomainError> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    async fn recover_interrupted(&self) -> Result<usize, DomainError> {
        let mut recovered = 0;

        for mut item in self.repository.list().await? {
            if item.is_terminal() {
                continue;
            }
            warn!(work_item_id = %item.id(), state = %item.state(), "Recovering interrupted work item");
            item.fail(INTERRUPTED_ERROR)?;
            self.repository.save(&item).await?;
            recovered += 1;
        }

        if recovered > 0 {
            info!(count = recovered, "Recovered interrupted work items");
        }
        Ok(recovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::agent::AgentEngineConfig;
    use crate::domain::approval::ApprovalOutcome;
    use crate::domain::approval::mock::ScriptedApprovalGateway;
    use crate::domain::reasoning::mock::ScriptedReasoningGateway;
    use crate::domain::retrieval::mock::MockRetrievalGateway;
    use crate::domain::work_item::{Classification, InputMessage, WorkItemState};
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::work_item::StorageWorkItemRepository;

    fn service_with(
        reasoning: ScriptedReasoningGateway,
        approval: ScriptedApprovalGateway,
    ) -> (AgentService, Arc<StorageWorkItemRepository>) {
        let repository = Arc::new(StorageWorkItemRepository::new(Arc::new(
            InMemoryStorage::new(),
        )));
        let engine = Arc::new(AgentEngine::new(
            repository.clone(),
            Arc::new(reasoning),
            Arc::new(MockRetrievalGateway::new(vec![])),
            Arc::new(approval),
            AgentEngineConfig::default(),
        ));
        (AgentService::new(repository.clone(), engine), repository)
    }

    fn service() -> (AgentService, Arc<StorageWorkItemRepository>) {
        service_with(
            ScriptedReasoningGateway::always_ready(),
            ScriptedApprovalGateway::new(),
        )
    }

    async fn wait_for_result(service: &AgentService, id: &WorkItemId) -> String {
        for _ in 0..100 {
            if let Some(result) = service.poll(id.as_str()).await.unwrap() {
                return result;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("workflow did not finish");
    }

    fn started_id(outcome: StartOutcome) -> WorkItemId {
        match outcome {
            StartOutcome::Started { id, .. } => id,
            other => panic!("expected a started workflow, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_and_poll_until_answered() {
        let (service, _) = service();

        let outcome = service
            .start(InitialInput::from_question("What is the refund policy?"))
            .await
            .unwrap();
        let id = started_id(outcome);

        assert_eq!(wait_for_result(&service, &id).await, "draft 1");

        let item = service.get(id.as_str()).await.unwrap();
        assert_eq!(item.state(), WorkItemState::Completed);
        assert_eq!(item.actions().len(), 3);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_background_workflow_logs_inside_start_span() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let (service, _) = service();

        let outcome = service
            .start(InitialInput::from_question("Where are invoices?"))
            .await
            .unwrap();
        wait_for_result(&service, &started_id(outcome)).await;

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let finished = output
            .lines()
            .find(|line| line.contains("Workflow finished"))
            .expect("workflow completion was not logged");
        assert!(finished.contains("start{"), "missing parent span: {}", finished);
        assert!(finished.contains("run_pipeline{"));
    }

    #[tokio::test]
    async fn test_start_returns_classifier_title() {
        let (service, _) = service();
        let input = InitialInput::from_question("Refunds?").with_classification(
            Classification::Question {
                title: Some("Refund policy".to_string()),
            },
        );

        let outcome = service.start(input).await.unwrap();

        match outcome {
            StartOutcome::Started { title, .. } => {
                assert_eq!(title.as_deref(), Some("Refund policy"))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ignored_input_creates_nothing() {
        let (service, repository) = service();
        let input = InitialInput::from_question("lol").with_classification(Classification::Ignore {
            reason: "small talk".to_string(),
        });

        let outcome = service.start(input).await.unwrap();

        assert_eq!(
            outcome,
            StartOutcome::Ignored {
                reason: "small talk".to_string()
            }
        );
        assert!(repository.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let (service, _) = service();
        let input = InitialInput::new(vec![InputMessage::new("u1", "   ")]);

        let result = service.start(input).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_poll_in_flight_returns_none() {
        let (service, repository) = service();
        let item = repository
            .create(InitialInput::from_question("pending"))
            .await
            .unwrap();

        assert_eq!(service.poll(item.id().as_str()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_poll_unknown_and_malformed_ids() {
        let (service, _) = service();

        let unknown = WorkItemId::generate();
        assert!(matches!(
            service.poll(unknown.as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.poll("not-an-id").await,
            Err(DomainError::InvalidId { .. })
        ));
    }

    #[tokio::test]
    async fn test_poll_failed_item_returns_fallback() {
        let (service, repository) = service();
        let mut item = repository
            .create(InitialInput::from_question("q"))
            .await
            .unwrap();
        item.fail("LLM down").unwrap();
        repository.save(&item).await.unwrap();

        assert_eq!(
            service.poll(item.id().as_str()).await.unwrap(),
            Some("sorry, I couldn't get an answer".to_string())
        );
    }

    #[tokio::test]
    async fn test_run_to_completion_with_takeover() {
        let (service, _) = service_with(
            ScriptedReasoningGateway::always_ready(),
            ScriptedApprovalGateway::new().then(ApprovalOutcome::takeover()),
        );

        let item = service
            .run_to_completion(InitialInput::from_question("Can I talk to a human?"))
            .await
            .unwrap();

        assert_eq!(item.state(), WorkItemState::Cancelled);
        assert_eq!(item.result(), Some("Human took over"));
    }

    #[tokio::test]
    async fn test_recover_interrupted() {
        let (service, repository) = service();
        let running = repository
            .create(InitialInput::from_question("one"))
            .await
            .unwrap();
        let mut paused = repository
            .create(InitialInput::from_question("two"))
            .await
            .unwrap();
        paused.pause().unwrap();
        repository.save(&paused).await.unwrap();
        let mut done = repository
            .create(InitialInput::from_question("three"))
            .await
            .unwrap();
        done.complete("answer").unwrap();
        repository.save(&done).await.unwrap();

        assert_eq!(service.recover_interrupted().await.unwrap(), 2);

        let running = repository.load(running.id()).await.unwrap();
        assert_eq!(running.state(), WorkItemState::Failed);
        assert_eq!(running.error(), Some(INTERRUPTED_ERROR));
        let paused = repository.load(paused.id()).await.unwrap();
        assert_eq!(paused.state(), WorkItemState::Failed);
        let done = repository.load(done.id()).await.unwrap();
        assert_eq!(done.result(), Some("answer"));

        assert_eq!(service.recover_interrupted().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (service, repository) = service();
        let first = repository
            .create(InitialInput::from_question("first"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = repository
            .create(InitialInput::from_question("second"))
            .await
            .unwrap();

        let items = service.list().await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id(), second.id());
        assert_eq!(items[1].id(), first.id());
    }
}
