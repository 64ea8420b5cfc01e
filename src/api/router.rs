use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// Full application router: probes, `/metrics` when enabled and the v1 API
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    cors_allowed_origins: &[String],
) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(cors_allowed_origins));

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    cors.allow_origin(AllowOrigin::list(origins))
}
