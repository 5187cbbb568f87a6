//! Kubernetes external-metrics wire schema.
//!
//! Serde-shaped to match what `k8s.io/metrics`' external-metrics client
//! deserializes: camelCase field names, `kind`/`apiVersion` on both the
//! list and each item, a stringified-epoch resource version, an RFC3339
//! observation timestamp, and a decimal quantity string.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// API group/version this server speaks.
pub const API_VERSION: &str = "external.metrics.k8s.io/v1beta1";

/// Fixed path prefix metric queries arrive under.
pub const URL_PREFIX: &str = "/apis/external.metrics.k8s.io/v1beta1/namespaces/";

/// The response envelope: always exactly one item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetricValueList {
    pub kind: &'static str,
    pub api_version: &'static str,
    pub metadata: ListMeta,
    pub items: Vec<ExternalMetricValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// Stringified Unix timestamp, fresh per response.
    pub resource_version: String,
}

/// One observed metric value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetricValue {
    pub kind: &'static str,
    pub api_version: &'static str,
    pub metric_name: String,
    /// The selector pair the caller supplied, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_labels: Option<HashMap<String, String>>,
    /// RFC3339 observation time.
    pub timestamp: String,
    /// Decimal quantity string.
    pub value: String,
}

impl ExternalMetricValueList {
    /// Build a single-item list for one resolved scalar, stamped with
    /// the current wall clock.
    pub fn single(name: &str, scalar: i64, labels: Option<HashMap<String, String>>) -> Self {
        Self {
            kind: "ExternalMetricValueList",
            api_version: API_VERSION,
            metadata: ListMeta {
                resource_version: epoch_secs().to_string(),
            },
            items: vec![ExternalMetricValue {
                kind: "ExternalMetricValue",
                api_version: API_VERSION,
                metric_name: name.to_string(),
                metric_labels: labels,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                value: scalar.to_string(),
            }],
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_with_k8s_field_names() {
        let list = ExternalMetricValueList::single("cpu", 10, None);
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["kind"], "ExternalMetricValueList");
        assert_eq!(json["apiVersion"], API_VERSION);
        assert!(json["metadata"]["resourceVersion"].is_string());

        let item = &json["items"][0];
        assert_eq!(item["kind"], "ExternalMetricValue");
        assert_eq!(item["apiVersion"], API_VERSION);
        assert_eq!(item["metricName"], "cpu");
        assert_eq!(item["value"], "10");
        assert!(item["timestamp"].is_string());
        // No selector supplied, so the labels field is omitted entirely.
        assert!(item.get("metricLabels").is_none());
    }

    #[test]
    fn selector_pair_lands_in_metric_labels() {
        let labels = HashMap::from([("zone".to_string(), "us".to_string())]);
        let list = ExternalMetricValueList::single("cpu", 5, Some(labels));
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["items"][0]["metricLabels"]["zone"], "us");
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let list = ExternalMetricValueList::single("cpu", 1, None);
        let ts = list.items[0].timestamp.clone();
        assert!(ts.ends_with('Z'), "timestamp not UTC: {ts}");
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
