//! Per-request span, access log and HTTP metrics.

use std::time::Instant;

use salvo::{
    Request, handler,
    http::{StatusCode, header::HeaderValue},
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;
use uuid::Uuid;

use crate::extensions::*;

use super::{metrics, propagation, routes, settings};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the caller's request id when it sent one.
fn request_id(req: &Request) -> String {
    req.header::<String>(REQUEST_ID_HEADER)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();
    let request_id = request_id(req);

    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => warn!(request_id, "request id is not a valid header value: {source}"),
    }

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let route = routes::route_template(&path);
    let _in_flight = metrics::InFlight::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %format!("{method} {route}"),
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        route = %route,
        remote_addr = %req.remote_addr(),
        user_uuid = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    let settings = settings::current();

    if settings.propagate_parent
        && let Some(parent) = propagation::parent_context(req.headers())
        && let Err(source) = span.set_parent(parent)
    {
        warn!("failed to attach caller trace context: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    // Set by the auth middleware further down the chain.
    if let Ok(principal) = depot.principal_or_401() {
        span.record("user_uuid", tracing::field::display(principal.user_uuid));
    }

    let status = res.status_code.unwrap_or(StatusCode::OK);
    let elapsed = started.elapsed();

    metrics::observe_request(&method, &route, status.as_u16(), elapsed.as_secs_f64());

    log_completion(&span, status, elapsed.as_millis(), settings.slow_request_ms);
}

fn log_completion(span: &Span, status: StatusCode, duration_ms: u128, slow_request_ms: u64) {
    let slow_after_ms = u128::from(slow_request_ms);

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        if status.is_server_error() {
            error!(status = status.as_u16(), duration_ms, "request failed");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), duration_ms, "request rejected");
        } else {
            info!(status = status.as_u16(), duration_ms, "request completed");
        }

        if duration_ms > slow_after_ms {
            warn!(duration_ms, slow_after_ms, "slow request");
        }
    });
}
