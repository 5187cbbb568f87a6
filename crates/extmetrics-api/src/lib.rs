//! extmetrics-api — the HTTP query surface of the external-metrics server.
//!
//! Serves the Kubernetes external-metrics resource schema that a
//! horizontal pod autoscaler's metrics client consumes:
//!
//! ```text
//! GET /apis/external.metrics.k8s.io/v1beta1/namespaces/{namespace}/{metric}
//!     ?labelSelector={label}={value}
//! ```
//!
//! Requests resolve against a shared [`Registry`]; responses are
//! single-item `ExternalMetricValueList` envelopes. Unknown namespaces
//! or metrics map to 400 with the detail kept server-side.

pub mod error;
pub mod handlers;
pub mod resolver;
pub mod wire;

pub use error::QueryError;

use axum::Router;
use axum::routing::get;
use extmetrics_registry::Registry;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Registry,
}

/// Build the external-metrics query router.
///
/// Everything under the API prefix lands in one wildcard handler so the
/// handler, not the router, classifies bad segment counts (400, not
/// 404). The wildcard cannot match an empty tail, so the bare prefix
/// gets its own 400 routes.
pub fn build_router(registry: Registry) -> Router {
    let route = format!("{}{{*rest}}", wire::URL_PREFIX);
    Router::new()
        .route(&route, get(handlers::get_metric))
        .route(wire::URL_PREFIX, get(handlers::bare_prefix))
        .route(
            wire::URL_PREFIX.trim_end_matches('/'),
            get(handlers::bare_prefix),
        )
        .with_state(ApiState { registry })
}
