//! Request, response and error types of the HTTP API

pub mod agent;
pub mod error;
pub mod json;

pub use agent::{
    AgentIgnoredResponse, AgentStartedResponse, ApprovalResolvedResponse,
    PendingApprovalsResponse, StartAgentRequest, WorkItemResponse, WorkItemsListResponse,
};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
