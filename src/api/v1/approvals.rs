//! Reviewer endpoints for drafts waiting on a human decision

use std::sync::Arc;

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApprovalResolvedResponse, Json, PendingApprovalsResponse};
use crate::domain::DomainError;
use crate::domain::work_item::WorkItemId;
use crate::infrastructure::approval::{ChannelApprovalGateway, ReviewerResponse};

fn channel(state: &AppState) -> Result<&Arc<ChannelApprovalGateway>, ApiError> {
    state
        .approvals
        .as_ref()
        .ok_or_else(|| ApiError::not_found("Approval channel is not enabled"))
}

/// GET /v1/approvals
pub async fn list_approvals(
    State(state): State<AppState>,
) -> Result<Json<PendingApprovalsResponse>, ApiError> {
    let approvals = channel(&state)?.list_pending().await;
    Ok(Json(PendingApprovalsResponse { approvals }))
}

/// POST /v1/approvals/{id}
pub async fn resolve_approval(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(response): Json<ReviewerResponse>,
) -> Result<Json<ApprovalResolvedResponse>, ApiError> {
    let gateway = channel(&state)?;
    let id = WorkItemId::new(id).map_err(DomainError::from)?;

    let outcome = gateway.resolve(&id, response).await?;

    Ok(Json(ApprovalResolvedResponse {
        id: id.to_string(),
        approved: outcome.approved,
        takeover: outcome.takeover,
        feedback: outcome.feedback,
    }))
}
