//! Approval requests parked until a reviewer answers over the HTTP API

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, oneshot};
use tracing::{info, warn};

use crate::domain::DomainError;
use crate::domain::approval::{ApprovalGateway, ApprovalOutcome, ApprovalRequest};
use crate::domain::work_item::WorkItemId;

/// An approval waiting on a reviewer
#[derive(Debug, Clone, Serialize)]
pub struct PendingApproval {
    #[serde(flatten)]
    pub request: ApprovalRequest,
    pub requested_at: DateTime<Utc>,
}

/// What a reviewer submits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewerResponse {
    pub approved: bool,
    #[serde(default)]
    pub feedback: Option<String>,
    /// Name of the picked reject option; its preset feedback wins over `feedback`
    #[serde(default)]
    pub option: Option<String>,
}

#[derive(Debug)]
struct Waiter {
    approval: PendingApproval,
    sender: oneshot::Sender<ApprovalOutcome>,
}

/// Registry of in-flight approval requests, one per work item
#[derive(Debug, Default)]
pub struct ChannelApprovalGateway {
    pending: Mutex<HashMap<WorkItemId, Waiter>>,
}

impl ChannelApprovalGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending approvals, oldest first
    pub async fn list_pending(&self) -> Vec<PendingApproval> {
        let pending = self.pending.lock().await;
        let mut approvals: Vec<_> = pending.values().map(|w| w.approval.clone()).collect();
        approvals.sort_by_key(|a| a.requested_at);
        approvals
    }

    /// Deliver a reviewer's decision to the waiting workflow
    pub async fn resolve(
        &self,
        id: &WorkItemId,
        response: ReviewerResponse,
    ) -> Result<ApprovalOutcome, DomainError> {
        let (waiter, outcome) = {
            let mut pending = self.pending.lock().await;
            let waiter = pending.get(id).ok_or_else(|| {
                DomainError::not_found(format!("No pending approval for work item '{}'", id))
            })?;

            let feedback = match (&response.option, response.approved) {
                (Some(option), false) => {
                    let known = waiter
                        .approval
                        .request
                        .reject_options
                        .iter()
                        .any(|o| &o.name == option);
                    if !known {
                        return Err(DomainError::validation(format!(
                            "Unknown reject option '{}'",
                            option
                        )));
                    }
                    waiter
                        .approval
                        .request
                        .option_feedback(option)
                        .map(str::to_string)
                        .or(response.feedback)
                }
                _ => response.feedback,
            };

            let outcome = ApprovalOutcome::from_response(response.approved, feedback);
            let waiter = pending
                .remove(id)
                .ok_or_else(|| DomainError::internal("Pending approval vanished"))?;
            (waiter, outcome)
        };

        if waiter.sender.send(outcome.clone()).is_err() {
            warn!(work_item_id = %id, "Workflow stopped waiting before the decision arrived");
            return Err(DomainError::conflict(format!(
                "Work item '{}' is no longer waiting for approval",
                id
            )));
        }

        info!(
            work_item_id = %id,
            approved = outcome.approved,
            takeover = outcome.takeover,
            "Approval resolved"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl ApprovalGateway for ChannelApprovalGateway {
    async fn request_approval(
        &self,
        request: ApprovalRequest,
    ) -> Result<ApprovalOutcome, DomainError> {
        let id = request.work_item_id.clone();
        let (sender, receiver) = oneshot::channel();

        {
            let mut pending = self.pending.lock().await;
            if pending.contains_key(&id) {
                return Err(DomainError::conflict(format!(
                    "Work item '{}' already has a pending approval",
                    id
                )));
            }
            pending.insert(
                id.clone(),
                Waiter {
                    approval: PendingApproval {
                        request,
                        requested_at: Utc::now(),
                    },
                    sender,
                },
            );
        }

        info!(work_item_id = %id, "Waiting for approval");

        receiver.await.map_err(|_| {
            DomainError::internal(format!("Approval channel for '{}' was closed", id))
        })
    }

    fn gateway_name(&self) -> &'static str {
        "channel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::approval::{TAKE_OVER_OPTION, TAKEOVER_SENTINEL};

    async fn wait_for_pending(gateway: &ChannelApprovalGateway) -> PendingApproval {
        for _ in 0..100 {
            if let Some(p) = gateway.list_pending().await.into_iter().next() {
                return p;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("approval never became pending");
    }

    fn spawn_request(
        gateway: &Arc<ChannelApprovalGateway>,
        id: &WorkItemId,
    ) -> tokio::task::JoinHandle<Result<ApprovalOutcome, DomainError>> {
        let gateway = gateway.clone();
        let request = ApprovalRequest::new(id.clone(), "What is X?", "X is Y");
        tokio::spawn(async move { gateway.request_approval(request).await })
    }

    #[tokio::test]
    async fn test_approve_releases_waiter() {
        let gateway = Arc::new(ChannelApprovalGateway::new());
        let id = WorkItemId::generate();
        let handle = spawn_request(&gateway, &id);

        let pending = wait_for_pending(&gateway).await;
        assert_eq!(pending.request.answer, "X is Y");

        let response = ReviewerResponse {
            approved: true,
            ..Default::default()
        };
        gateway.resolve(&id, response).await.unwrap();

        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.approved);
        assert!(gateway.list_pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_take_over_option_maps_to_sentinel() {
        let gateway = Arc::new(ChannelApprovalGateway::new());
        let id = WorkItemId::generate();
        let handle = spawn_request(&gateway, &id);
        wait_for_pending(&gateway).await;

        let response = ReviewerResponse {
            approved: false,
            feedback: Some("ignored".into()),
            option: Some(TAKE_OVER_OPTION.into()),
        };
        gateway.resolve(&id, response).await.unwrap();

        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.takeover);
        assert_eq!(outcome.feedback.as_deref(), Some(TAKEOVER_SENTINEL));
    }

    #[tokio::test]
    async fn test_free_text_feedback() {
        let gateway = Arc::new(ChannelApprovalGateway::new());
        let id = WorkItemId::generate();
        let handle = spawn_request(&gateway, &id);
        wait_for_pending(&gateway).await;

        let response = ReviewerResponse {
            approved: false,
            feedback: Some("mention the CLI flag".into()),
            option: Some("incorporate_feedback".into()),
        };
        gateway.resolve(&id, response).await.unwrap();

        let outcome = handle.await.unwrap().unwrap();
        assert!(!outcome.takeover);
        assert_eq!(outcome.feedback.as_deref(), Some("mention the CLI flag"));
    }

    #[tokio::test]
    async fn test_unknown_option_keeps_request_pending() {
        let gateway = Arc::new(ChannelApprovalGateway::new());
        let id = WorkItemId::generate();
        let _handle = spawn_request(&gateway, &id);
        wait_for_pending(&gateway).await;

        let response = ReviewerResponse {
            approved: false,
            feedback: None,
            option: Some("escalate".into()),
        };
        let err = gateway.resolve(&id, response).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(gateway.list_pending().await.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_not_found() {
        let gateway = ChannelApprovalGateway::new();
        let err = gateway
            .resolve(&WorkItemId::generate(), ReviewerResponse::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
