//! Application state shared by the handlers

use std::sync::Arc;

use crate::infrastructure::approval::ChannelApprovalGateway;
use crate::infrastructure::services::AgentServiceTrait;

#[derive(Clone, Debug)]
pub struct AppState {
    pub agent_service: Arc<dyn AgentServiceTrait>,
    /// Present when reviewers answer over HTTP (`approval.mode = channel`)
    pub approvals: Option<Arc<ChannelApprovalGateway>>,
}

impl AppState {
    pub fn new(agent_service: Arc<dyn AgentServiceTrait>) -> Self {
        Self {
            agent_service,
            approvals: None,
        }
    }

    pub fn with_approvals(mut self, approvals: Arc<ChannelApprovalGateway>) -> Self {
        self.approvals = Some(approvals);
        self
    }
}
