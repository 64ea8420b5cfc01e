//! Request logging with sensitive header redaction

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{info, warn};

use super::route_path;

/// Logs each request and its outcome.
///
/// Runs inside `TraceLayer`, which owns the request span; opening another
/// span here would duplicate it.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = route_path(&request);
    let request_id = request_id(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %loggable_headers(&request),
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request completed"
        );
    }

    response
}

fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

fn loggable_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "x-api-key" | "cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "user-agent"
            | "x-forwarded-for"
            | "authorization"
            | "x-api-key"
    )
}
