//! Observability infrastructure - tracing and metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    PrometheusMetrics, create_metrics_router, init_metrics, record_agent_step,
    record_approval_wait, record_http_request, record_workflow_outcome, record_workflow_started,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
