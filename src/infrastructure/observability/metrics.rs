//! Prometheus metrics

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::work_item::{ActionType, WorkItemState};

static ID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(wi-)?[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});

#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("rag_agent_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized");
            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Prometheus metrics");
            None
        }
    }
}

pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

pub fn record_workflow_started() {
    counter!("agent_workflows_started_total").increment(1);
}

pub fn record_workflow_outcome(state: WorkItemState) {
    counter!("agent_workflow_outcomes_total", "state" => state.to_string()).increment(1);
}

pub fn record_agent_step(action: ActionType) {
    counter!("agent_steps_total", "action" => action.as_str()).increment(1);
}

pub fn record_approval_wait(duration: Duration) {
    histogram!("agent_approval_wait_seconds").record(duration.as_secs_f64());
}

/// Collapse ids so the path label stays low-cardinality
fn sanitize_path(path: &str) -> String {
    ID_SEGMENT.replace_all(path, "{id}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_work_item_id() {
        let path = "/v1/agents/wi-550e8400-e29b-41d4-a716-446655440000/state";
        assert_eq!(sanitize_path(path), "/v1/agents/{id}/state");
    }

    #[test]
    fn test_sanitize_path_plain() {
        assert_eq!(sanitize_path("/v1/approvals"), "/v1/approvals");
    }
}
