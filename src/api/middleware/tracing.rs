//! Request spans for the HTTP surface.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Trace layer applied once around the merged router.
///
/// Every request gets an `INFO` span carrying method, URI and version.
/// Headers are never recorded, so bearer tokens stay out of the logs.
/// Request start is logged at `DEBUG`, completion at `INFO` with status and
/// latency in milliseconds, and 5xx responses again at `ERROR`.
///
/// ```text
/// INFO request{method=GET uri=/Ab3dE9 version=HTTP/1.1}: finished processing request latency=2 ms status=302
/// ERROR request{method=GET uri=/analytics/promo version=HTTP/1.1}: response failed classification=Status code: 500 Internal Server Error latency=31 ms
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(
            DefaultMakeSpan::new()
                .level(Level::INFO)
                .include_headers(false),
        )
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
