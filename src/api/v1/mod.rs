//! v1 API endpoints

pub mod agents;
pub mod approvals;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/agents",
            post(agents::start_agent).get(agents::list_agents),
        )
        .route("/agents/{id}", get(agents::poll_agent))
        .route("/agents/{id}/state", get(agents::get_agent_state))
        .route("/approvals", get(approvals::list_approvals))
        .route("/approvals/{id}", post(approvals::resolve_approval))
}
