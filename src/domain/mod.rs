//! Domain layer - entities, collaborator traits and the failure taxonomy

pub mod agent;
pub mod approval;
pub mod error;
pub mod llm;
pub mod reasoning;
pub mod retrieval;
pub mod storage;
pub mod work_item;

pub use agent::{
    AgentEngineConfig, AgentError, ContextAccumulator, ContextFragment, FragmentIntent,
    RetryPolicy,
};
pub use approval::{ApprovalGateway, ApprovalOutcome, ApprovalRequest, RejectOption};
pub use error::DomainError;
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use reasoning::{NextAction, ReasoningGateway};
pub use retrieval::{RetrievalGateway, RetrievedSnippet, SourceFilter, SourceKind};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use work_item::{
    Action, ActionType, Classification, InitialInput, InputMessage, WorkItem, WorkItemId,
    WorkItemRepository, WorkItemState,
};
