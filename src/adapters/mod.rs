//! Adapters Layer - Concrete Implementations of Ports
//!
//! Adapter categories:
//! - `persistence`: in-memory store ports + JSONL audit log
//! - `metrics`: Prometheus registry and health/readiness probes

pub mod metrics;
pub mod persistence;
