//! The shared metric registry and its per-metric update loops.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tracing::{debug, warn};

use crate::trigger::{Trigger, TriggerSource};
use crate::value::MetricValue;

/// Wildcard namespace: the metric applies across all namespaces. This is
/// a convention between callers and their autoscalers — the registry
/// treats every namespace as an opaque key.
pub const NAMESPACE_ALL: &str = "*";

/// The conventional default namespace.
pub const NAMESPACE_DEFAULT: &str = "default";

/// A user-supplied metric computation, invoked once per trigger fire.
///
/// Receives the fire (with its compute-budget hint) plus the namespace
/// and name the metric was registered under. A returned error is logged
/// and the previously stored value stays in place.
pub type MetricFn = Arc<dyn Fn(Trigger, &str, &str) -> BoxFuture + Send + Sync>;

type BoxFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<MetricValue>> + Send>>;

/// `metrics[namespace][name]` is the latest value of that metric.
type MetricMap = HashMap<String, HashMap<String, MetricValue>>;

/// The shared namespace → name → value store, plus registration.
///
/// Cloning is cheap; every clone shares one store and one shutdown
/// channel. Update loops write and request handlers read concurrently,
/// so the store sits behind an async `RwLock` — readers observe a value
/// from before or after any given write, never a torn one.
#[derive(Clone)]
pub struct Registry {
    metrics: Arc<RwLock<MetricMap>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            metrics: Arc::new(RwLock::new(HashMap::new())),
            shutdown_tx,
        }
    }

    /// Register a metric and start its update loop.
    ///
    /// Seeds `(namespace, name)` with a zero value so the metric is
    /// queryable before the first computation completes, then spawns
    /// one task that invokes `f` on every fire of `trigger` until the
    /// trigger closes or [`Registry::shutdown`] is called.
    ///
    /// Registering the same pair twice resets the stored value and
    /// starts a second, independent loop racing the first on writes.
    /// Readers still only ever see whole values, from one loop or the
    /// other; callers who want a single writer should not reuse a name.
    pub async fn register(
        &self,
        namespace: &str,
        name: &str,
        trigger: TriggerSource,
        f: MetricFn,
    ) {
        {
            let mut metrics = self.metrics.write().await;
            metrics
                .entry(namespace.to_string())
                .or_default()
                .insert(name.to_string(), MetricValue::new(0));
        }
        debug!(%namespace, %name, "metric registered");

        let registry = self.clone();
        let namespace = namespace.to_string();
        let name = name.to_string();
        let shutdown = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            registry
                .run_update_loop(namespace, name, trigger, f, shutdown)
                .await;
        });
    }

    /// Latest value for `(namespace, name)`, if registered.
    pub async fn lookup(&self, namespace: &str, name: &str) -> Option<MetricValue> {
        let metrics = self.metrics.read().await;
        metrics
            .get(namespace)
            .and_then(|names| names.get(name))
            .cloned()
    }

    /// Whether any metric has been registered under `namespace`.
    pub async fn contains_namespace(&self, namespace: &str) -> bool {
        self.metrics.read().await.contains_key(namespace)
    }

    /// Stop every update loop. Loops exit promptly and perform no
    /// further writes; stored values remain queryable.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    async fn run_update_loop(
        &self,
        namespace: String,
        name: String,
        mut trigger: TriggerSource,
        f: MetricFn,
        mut shutdown: watch::Receiver<bool>,
    ) {
        debug!(%namespace, %name, "update loop started");

        loop {
            tokio::select! {
                fire = trigger.recv() => match fire {
                    Some(t) => self.run_once(t, &namespace, &name, &f).await,
                    None => {
                        debug!(%namespace, %name, "trigger source closed, update loop exiting");
                        break;
                    }
                },
                _ = shutdown.changed() => {
                    debug!(%namespace, %name, "update loop shutting down");
                    break;
                }
            }
        }
    }

    /// One computation: on success the result replaces the stored value
    /// wholesale; on error the last good value stays visible until the
    /// next fire. No retry, no backoff.
    async fn run_once(&self, fire: Trigger, namespace: &str, name: &str, f: &MetricFn) {
        match f(fire, namespace, name).await {
            Ok(value) => {
                let mut metrics = self.metrics.write().await;
                metrics
                    .entry(namespace.to_string())
                    .or_default()
                    .insert(name.to_string(), value);
            }
            Err(e) => {
                warn!(%namespace, %name, error = %e, "metric computation failed");
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
