//! Agent workflow endpoints: start, poll and inspect

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    AgentIgnoredResponse, AgentStartedResponse, ApiError, Json, StartAgentRequest,
    WorkItemResponse, WorkItemsListResponse,
};
use crate::infrastructure::services::StartOutcome;

/// POST /v1/agents
pub async fn start_agent(
    State(state): State<AppState>,
    Json(request): Json<StartAgentRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.agent_service.start(request.into()).await?;

    let response = match outcome {
        StartOutcome::Started { id, title } => (
            StatusCode::ACCEPTED,
            Json(AgentStartedResponse {
                id: id.to_string(),
                title,
            }),
        )
            .into_response(),
        StartOutcome::Ignored { reason } => {
            (StatusCode::OK, Json(AgentIgnoredResponse::new(reason))).into_response()
        }
    };

    Ok(response)
}

/// GET /v1/agents/{id}: the result string, or `null` while in progress
pub async fn poll_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<String>>, ApiError> {
    let result = state.agent_service.poll(&id).await?;
    debug!(work_item_id = %id, finished = result.is_some(), "Polled work item");
    Ok(Json(result))
}

/// GET /v1/agents/{id}/state
pub async fn get_agent_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkItemResponse>, ApiError> {
    let item = state.agent_service.get(&id).await?;
    Ok(Json(WorkItemResponse::from(&item)))
}

/// GET /v1/agents
pub async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<WorkItemsListResponse>, ApiError> {
    let items = state.agent_service.list().await?;
    Ok(Json(WorkItemsListResponse::from(items)))
}
