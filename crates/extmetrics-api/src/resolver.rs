//! Query resolution — registry lookup plus selector fallback.

use extmetrics_registry::Registry;

use crate::error::QueryError;

/// Resolve `(namespace, name)` under an optional selector pair.
///
/// A missing namespace or metric is an error. An unknown selector is
/// not: it falls back to the metric's base value, so an autoscaler
/// asking for a dimension the computation never filled still gets the
/// aggregate number.
pub async fn resolve(
    registry: &Registry,
    namespace: &str,
    name: &str,
    label: &str,
    value: &str,
) -> Result<i64, QueryError> {
    if !registry.contains_namespace(namespace).await {
        return Err(QueryError::NamespaceNotFound {
            namespace: namespace.to_string(),
        });
    }

    let metric = registry
        .lookup(namespace, name)
        .await
        .ok_or_else(|| QueryError::MetricNotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;

    Ok(metric.resolve(label, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use extmetrics_registry::{MetricFn, MetricValue, Trigger, TriggerSource};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    async fn registry_with(namespace: &str, name: &str, value: MetricValue) -> Registry {
        let registry = Registry::new();
        let (tx, rx) = mpsc::channel(1);
        let stored = value.clone();
        let f: MetricFn = Arc::new(move |_, _, _| {
            let v = stored.clone();
            Box::pin(async move { Ok(v) })
        });
        registry
            .register(namespace, name, TriggerSource::from_channel(rx), f)
            .await;
        tx.send(Trigger::default()).await.unwrap();

        for _ in 0..200 {
            if registry.lookup(namespace, name).await.map(|v| v.base()) == Some(value.base()) {
                return registry;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("metric value was never stored");
    }

    #[tokio::test]
    async fn resolves_base_without_selector() {
        let registry = registry_with("default", "cpu", MetricValue::new(10)).await;
        assert_eq!(resolve(&registry, "default", "cpu", "", "").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn resolves_selector_scalar() {
        let mut v = MetricValue::new(10);
        v.add_selector("zone", "us", 5);
        let registry = registry_with("default", "cpu", v).await;

        assert_eq!(resolve(&registry, "default", "cpu", "zone", "us").await.unwrap(), 5);
        assert_eq!(resolve(&registry, "default", "cpu", "zone", "eu").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn unknown_namespace_is_an_error() {
        let registry = Registry::new();
        let err = resolve(&registry, "default", "cpu", "", "").await.unwrap_err();
        assert!(matches!(err, QueryError::NamespaceNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_metric_is_an_error() {
        let registry = registry_with("default", "cpu", MetricValue::new(1)).await;
        let err = resolve(&registry, "default", "memory", "", "").await.unwrap_err();
        assert!(matches!(err, QueryError::MetricNotFound { .. }));
    }
}
