//! Approves every draft; for local runs without a reviewer

use async_trait::async_trait;
use tracing::info;

use crate::domain::DomainError;
use crate::domain::approval::{ApprovalGateway, ApprovalOutcome, ApprovalRequest};

#[derive(Debug, Default)]
pub struct AutoApprovalGateway;

#[async_trait]
impl ApprovalGateway for AutoApprovalGateway {
    async fn request_approval(
        &self,
        request: ApprovalRequest,
    ) -> Result<ApprovalOutcome, DomainError> {
        info!(work_item_id = %request.work_item_id, "Auto-approving draft");
        Ok(ApprovalOutcome::approved())
    }

    fn gateway_name(&self) -> &'static str {
        "auto"
    }
}
