//! Subscriber setup with optional OpenTelemetry export

use opentelemetry::{KeyValue, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::config::TracingConfig;
use crate::config::LogFormat;
use crate::infrastructure::logging::LoggingConfig;

/// Install the global subscriber; `RUST_LOG` overrides the configured level
pub fn init_tracing(logging_config: &LoggingConfig, tracing_config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging_config.level));

    let (telemetry_layer, otel_error) = if tracing_config.enabled {
        match init_otel_tracing(tracing_config) {
            Ok(provider) => {
                let tracer = provider.tracer("rag-agent");
                opentelemetry::global::set_tracer_provider(provider);
                (
                    Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                    None,
                )
            }
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(telemetry_layer);

    match logging_config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init(),
    }

    match (tracing_config.enabled, otel_error) {
        (true, None) => tracing::info!(
            endpoint = %tracing_config.otlp_endpoint,
            "Tracing initialized with OpenTelemetry export"
        ),
        (true, Some(e)) => tracing::warn!(
            error = %e,
            "Failed to initialize OpenTelemetry, exporting disabled"
        ),
        (false, _) => tracing::info!("Tracing initialized (OpenTelemetry disabled)"),
    }
}

fn init_otel_tracing(
    config: &TracingConfig,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let resource = Resource::new(vec![KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    Ok(TracerProvider::builder()
        .with_sampler(sampler_for(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build())
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

/// Flush pending spans
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Tracing shutdown complete");
}
