//! Request logging settings fixed at startup.

use std::sync::OnceLock;

use crate::config::telemetry::TelemetryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestSettings {
    pub(super) slow_request_ms: u64,
    pub(super) propagate_parent: bool,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            slow_request_ms: 1_000,
            propagate_parent: false,
        }
    }
}

static SETTINGS: OnceLock<RequestSettings> = OnceLock::new();

/// Record the settings; later calls are ignored.
pub(super) fn configure(config: &TelemetryConfig) {
    _ = SETTINGS.set(RequestSettings {
        slow_request_ms: config.slow_request_ms,
        // A parent context is only useful when spans are exported.
        propagate_parent: config.propagate_parent && config.exports_traces(),
    });
}

/// The configured settings, or the defaults before [`configure`] runs (as in tests).
pub(super) fn current() -> RequestSettings {
    SETTINGS.get().copied().unwrap_or_default()
}
