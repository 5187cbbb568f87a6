//! extmetrics-registry — the core of the external-metrics server.
//!
//! Holds the shared namespace → name → value store, the per-metric
//! update loops that recompute values on trigger fires, and the trigger
//! sources that produce those fires.
//!
//! # Architecture
//!
//! ```text
//! TriggerSource ──fire──▶ update loop ──▶ MetricFn ──▶ Registry (write)
//!                                                          ▲
//! HTTP handler ──────────────── lookup ────────────────────┘ (read)
//! ```
//!
//! One tokio task runs per registered metric. All tasks share one
//! [`Registry`] and stop together on [`Registry::shutdown`].

pub mod registry;
pub mod trigger;
pub mod value;

pub use registry::{MetricFn, NAMESPACE_ALL, NAMESPACE_DEFAULT, Registry};
pub use trigger::{Trigger, TriggerSource};
pub use value::MetricValue;
