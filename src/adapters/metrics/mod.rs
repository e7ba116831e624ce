//! Metrics Adapters - Prometheus Export and Health Probes

pub mod health;
pub mod registry;

pub use health::{HealthServer, HealthState};
pub use registry::MetricsRegistry;
