//! HTTP handler for the external-metrics query endpoint.
//!
//! A pure parse → resolve → format pipeline. Error bodies are empty;
//! the detail stays in the server log.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::ApiState;
use crate::resolver;
use crate::wire::ExternalMetricValueList;

/// GET `{URL_PREFIX}{namespace}/{metric}?labelSelector={label}={value}`
///
/// The path tail is split by hand: exactly two non-empty segments, or
/// 400 before any registry lookup happens.
pub async fn get_metric(
    State(state): State<ApiState>,
    Path(rest): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let segments: Vec<&str> = rest.split('/').collect();
    let (namespace, name) = match segments.as_slice() {
        [namespace, name] if !namespace.is_empty() && !name.is_empty() => (*namespace, *name),
        _ => {
            warn!(path = %rest, "unable to parse metric path");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let (label, value) = parse_label_selector(params.get("labelSelector"));

    let scalar = match resolver::resolve(&state.registry, namespace, name, label, value).await {
        Ok(scalar) => scalar,
        Err(e) => {
            warn!(%namespace, %name, error = %e, "metric lookup failed");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let labels = if !label.is_empty() && !value.is_empty() {
        Some(HashMap::from([(label.to_string(), value.to_string())]))
    } else {
        None
    };

    let body = ExternalMetricValueList::single(name, scalar, labels);
    match serde_json::to_vec(&body) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!(%namespace, %name, error = %e, "response serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET on the bare API prefix: no namespace or metric segment at all.
///
/// Same contract as a wrong segment count — the path is the client's
/// error, not a routing miss.
pub async fn bare_prefix() -> Response {
    warn!("metric path missing namespace and name segments");
    StatusCode::BAD_REQUEST.into_response()
}

/// Split a `labelSelector` parameter into its pair.
///
/// Anything other than exactly `label=value` is ignored rather than
/// rejected — the query degrades to a base-value lookup.
fn parse_label_selector(raw: Option<&String>) -> (&str, &str) {
    let Some(raw) = raw else {
        return ("", "");
    };
    let parts: Vec<&str> = raw.split('=').collect();
    match parts.as_slice() {
        [label, value] => (label, value),
        _ => ("", ""),
    }
}
