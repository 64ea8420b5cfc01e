//! Approval gateway trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{ApprovalOutcome, ApprovalRequest};
use crate::domain::DomainError;

/// Human-in-the-loop review of a drafted answer.
///
/// `request_approval` suspends until a reviewer responds, which may take
/// minutes. Callers must not hold locks or store handles across the await.
#[async_trait]
pub trait ApprovalGateway: Send + Sync + Debug {
    async fn request_approval(
        &self,
        request: ApprovalRequest,
    ) -> Result<ApprovalOutcome, DomainError>;

    fn gateway_name(&self) -> &'static str;
}
