//! Error types for the query API.

use thiserror::Error;

/// Errors surfaced by the query resolver.
///
/// Both variants map to HTTP 400; the message is logged server-side and
/// never echoed to the client.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("namespace {namespace} either does not exist, or has no metrics stored against it")]
    NamespaceNotFound { namespace: String },

    #[error("metric {name} does not exist under namespace {namespace}")]
    MetricNotFound { namespace: String, name: String },
}
