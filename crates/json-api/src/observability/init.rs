//! Telemetry startup and shutdown.

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing::{error, info};

use crate::config::telemetry::TelemetryConfig;

use super::{ObservabilityError, logging, otel, settings};

/// Keeps the trace exporter alive until [`Observability::shutdown`].
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Observability {
    pub(crate) fn init(config: &TelemetryConfig) -> Result<Self, ObservabilityError> {
        settings::configure(config);

        let tracer_provider = config
            .otlp_endpoint
            .as_deref()
            .map(|endpoint| otel::tracer_provider(config, endpoint))
            .transpose()?;

        if tracer_provider.is_some() {
            global::set_text_map_propagator(TraceContextPropagator::new());
        }

        logging::init_subscriber(config, tracer_provider.as_ref())?;

        if let Some(endpoint) = &config.otlp_endpoint {
            info!(%endpoint, "exporting traces");
        }

        Ok(Self { tracer_provider })
    }

    /// Flush buffered spans.
    pub(crate) fn shutdown(self) {
        if let Some(provider) = self.tracer_provider
            && let Err(source) = provider.shutdown()
        {
            error!("failed to flush traces: {source}");
        }
    }
}
