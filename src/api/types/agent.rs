//! Agent and approval API types

use serde::{Deserialize, Serialize};

use crate::domain::work_item::{
    Action, Classification, InitialInput, InputMessage, WorkItem, WorkItemState,
};
use crate::infrastructure::approval::PendingApproval;

/// Body of `POST /v1/agents`: a bare question, a message list, or a full input
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StartAgentRequest {
    Question(String),
    Messages(Vec<InputMessage>),
    Input {
        messages: Vec<InputMessage>,
        #[serde(default)]
        classification: Option<Classification>,
    },
}

impl From<StartAgentRequest> for InitialInput {
    fn from(request: StartAgentRequest) -> Self {
        match request {
            StartAgentRequest::Question(question) => InitialInput::from_question(question),
            StartAgentRequest::Messages(messages) => InitialInput::new(messages),
            StartAgentRequest::Input {
                messages,
                classification,
            } => InitialInput {
                messages,
                classification,
            },
        }
    }
}

/// Response when a workflow is started (HTTP 202)
#[derive(Debug, Clone, Serialize)]
pub struct AgentStartedResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Response when the classifier dropped the input (HTTP 200)
#[derive(Debug, Clone, Serialize)]
pub struct AgentIgnoredResponse {
    pub ignored: bool,
    pub reason: String,
}

impl AgentIgnoredResponse {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            ignored: true,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkItemResponse {
    pub id: String,
    pub state: WorkItemState,
    pub initial_input: InitialInput,
    pub actions: Vec<Action>,
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&WorkItem> for WorkItemResponse {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id().to_string(),
            state: item.state(),
            initial_input: item.initial_input().clone(),
            actions: item.actions().to_vec(),
            result: item.result().map(String::from),
            error: item.error().map(String::from),
            created_at: item.created_at().to_rfc3339(),
            updated_at: item.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkItemsListResponse {
    pub work_items: Vec<WorkItemResponse>,
}

impl From<Vec<WorkItem>> for WorkItemsListResponse {
    fn from(items: Vec<WorkItem>) -> Self {
        Self {
            work_items: items.iter().map(WorkItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingApprovalsResponse {
    pub approvals: Vec<PendingApproval>,
}

/// Decision delivered to a paused workflow
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalResolvedResponse {
    pub id: String,
    pub approved: bool,
    pub takeover: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}
