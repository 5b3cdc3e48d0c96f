//! Logging and Tracing Config

use clap::{Args, ValueEnum};

/// Log line format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One line per event, for terminals
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

/// Logging, trace export and request timing settings.
#[derive(Debug, Args)]
pub struct TelemetryConfig {
    /// Default log level, overridden by `RUST_LOG` directives when set
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint; traces are only exported when this is set
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS", default_value_t = 3)]
    pub otlp_timeout_seconds: u64,

    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "bookshelf-json")]
    pub service_name: String,

    /// Fraction of new traces to sample, clamped to `0.0..=1.0`
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0)]
    pub trace_sample_ratio: f64,

    /// Continue traces from incoming `traceparent` headers
    #[arg(long, env = "OTEL_PROPAGATE_PARENT", default_value_t = false)]
    pub propagate_parent: bool,

    /// Requests slower than this are logged as warnings
    #[arg(long, env = "SLOW_REQUEST_MS", default_value_t = 1_000)]
    pub slow_request_ms: u64,
}

impl TelemetryConfig {
    #[must_use]
    pub fn exports_traces(&self) -> bool {
        self.otlp_endpoint.is_some()
    }
}
