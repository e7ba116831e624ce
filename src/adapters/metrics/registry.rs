//! Prometheus Metrics Registry - Arena Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers market settlement volume, rating update counts, and point
//! economy totals.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// Centralized Prometheus metrics for the arena core.
///
/// All metrics follow the naming convention `debate_arena_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Resolution events processed.
    pub resolutions_processed: IntCounter,
    /// Wagers settled, by result.
    pub wagers_settled: IntCounterVec,
    /// Total points credited to winners.
    pub points_paid: IntCounter,
    /// Rating updates applied, by track.
    pub rating_updates: IntCounterVec,
    /// Payout sweeps that ended incomplete and await retry.
    pub payout_retries_pending: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let resolutions_processed = IntCounter::new(
            "debate_arena_resolutions_processed_total",
            "Debate resolution events processed",
        )?;

        let wagers_settled = IntCounterVec::new(
            Opts::new("debate_arena_wagers_settled_total", "Wagers settled"),
            &["result"],
        )?;

        let points_paid = IntCounter::new(
            "debate_arena_points_paid_total",
            "Points credited to winning bettors",
        )?;

        let rating_updates = IntCounterVec::new(
            Opts::new("debate_arena_rating_updates_total", "Rating updates applied"),
            &["track"],
        )?;

        let payout_retries_pending = IntGauge::new(
            "debate_arena_payout_retries_pending",
            "Debates whose payout sweep ended incomplete",
        )?;

        registry.register(Box::new(resolutions_processed.clone()))?;
        registry.register(Box::new(wagers_settled.clone()))?;
        registry.register(Box::new(points_paid.clone()))?;
        registry.register(Box::new(rating_updates.clone()))?;
        registry.register(Box::new(payout_retries_pending.clone()))?;

        Ok(Self {
            registry,
            resolutions_processed,
            wagers_settled,
            points_paid,
            rating_updates,
            payout_retries_pending,
        })
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let registry = metrics_self.registry.clone();
                async move {
                    let encoder = TextEncoder::new();
                    let metric_families = registry.gather();
                    let mut buffer = Vec::new();
                    encoder.encode(&metric_families, &mut buffer).unwrap();
                    String::from_utf8(buffer).unwrap_or_default()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
