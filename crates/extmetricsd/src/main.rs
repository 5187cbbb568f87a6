//! extmetricsd — a demo external-metrics server.
//!
//! Registers one metric, `incrementable`, across all namespaces. Its
//! computation bumps three counters and exposes them under a `some-key`
//! selector, so an HPA can query:
//!
//! ```text
//! GET /apis/external.metrics.k8s.io/v1beta1/namespaces/*/incrementable
//! GET /apis/external.metrics.k8s.io/v1beta1/namespaces/*/incrementable?labelSelector=some-key=B
//! ```
//!
//! Serves until Ctrl-C, then stops every update loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{debug, info};

use extmetrics_registry::{MetricFn, MetricValue, NAMESPACE_ALL, Registry, TriggerSource};

#[derive(Parser)]
#[command(name = "extmetricsd", about = "Demo external-metrics API server")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Seconds between metric recomputations.
    #[arg(long, default_value = "1")]
    tick_interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,extmetricsd=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let registry = Registry::new();

    let counter_a = Arc::new(AtomicI64::new(0));
    let counter_b = Arc::new(AtomicI64::new(0));
    let counter_c = Arc::new(AtomicI64::new(0));

    let f: MetricFn = {
        let (a, b, c) = (counter_a.clone(), counter_b.clone(), counter_c.clone());
        Arc::new(move |_fire, _namespace, _name| {
            let (a, b, c) = (a.clone(), b.clone(), c.clone());
            Box::pin(async move {
                let a = a.fetch_add(1, Ordering::Relaxed) + 1;
                let b = b.fetch_add(5, Ordering::Relaxed) + 5;
                let c = c.fetch_sub(1, Ordering::Relaxed) - 1;
                debug!(a, b, c, "recomputed demo metric");

                let mut v = MetricValue::new(a);
                v.add_selector("some-key", "A", a);
                v.add_selector("some-key", "B", b);
                v.add_selector("some-key", "C", c);
                Ok(v)
            })
        })
    };

    registry
        .register(
            NAMESPACE_ALL,
            "incrementable",
            TriggerSource::interval(Duration::from_secs(cli.tick_interval)),
            f,
        )
        .await;
    info!(
        metric = "incrementable",
        tick_interval = cli.tick_interval,
        "demo metric registered"
    );

    let router = extmetrics_api::build_router(registry.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "external-metrics server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    registry.shutdown();
    info!("external-metrics server stopped");
    Ok(())
}
