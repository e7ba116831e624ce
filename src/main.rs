//! Debate Arena Core — Entry Point
//!
//! Initializes configuration, logging, stores, and the resolution
//! engine. Runs until SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create stores (in-memory) + JSONL audit log
//! 4. Construct usecases (BetLedger, PayoutDistributor, RatingEngine, stats)
//! 5. Spawn health server (/live + /ready)
//! 6. Spawn Prometheus metrics server (/metrics)
//! 7. Run resolution engine loop (event-driven tokio::select!)
//! 8. Wait for SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use adapters::persistence::{InMemoryStore, JsonlAuditLog};
use domain::debate::ResolutionEvent;
use ports::audit::AuditLog;
use usecases::bet_ledger::BetLedger;
use usecases::payout::{PayoutDistributor, PayoutError};
use usecases::rating_updater::RatingEngine;
use usecases::stats::UserStatsService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.arena.log_level)
            }),
        )
        .json()
        .init();

    info!(
        name = %config.arena.name,
        version = env!("CARGO_PKG_VERSION"),
        house_edge = config.market.house_edge,
        "Starting Debate Arena core"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    // ── 4. Stores + audit log ───────────────────────────────
    let store = Arc::new(InMemoryStore::new());
    let audit = Arc::new(
        JsonlAuditLog::new(&config.persistence.data_dir)
            .await
            .context("Failed to initialize audit log")?,
    );

    // ── 5. Usecases ─────────────────────────────────────────
    // The ledger and stats service are driven by the external API
    // layer; the resolution engine below owns payout + ratings.
    let _ledger = BetLedger::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&audit),
        &config.market,
    );
    let _stats = UserStatsService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        &config.market,
    );
    let distributor = PayoutDistributor::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&audit),
        config.market.superforecaster_min_bets,
        config.market.superforecaster_min_accuracy_pct,
    );
    let rating_engine = RatingEngine::new(Arc::clone(&store), Arc::clone(&store), &config.rating);

    // ── 6. Health server ────────────────────────────────────
    let health_state = Arc::new(HealthState::new());
    health_state.audit_healthy.store(
        audit.is_healthy().await,
        std::sync::atomic::Ordering::Relaxed,
    );
    let health_server = HealthServer::new(Arc::clone(&health_state), config.metrics.health_port);
    let health_handle = tokio::spawn(health_server.run(shutdown_tx.subscribe()));

    // ── 7. Prometheus metrics server ────────────────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to create metrics registry")?);
    let metrics_handle = if config.metrics.enabled {
        Some(tokio::spawn(Arc::clone(&metrics).serve(
            config.metrics.bind_address.clone(),
            shutdown_tx.subscribe(),
        )))
    } else {
        None
    };

    // ── 8. Resolution event channel ─────────────────────────
    // The sender side belongs to the orchestrator callback surface;
    // it is held here until that surface is attached.
    let (_resolution_tx, resolution_rx) = mpsc::channel::<ResolutionEvent>(64);

    // ── 9. Run the resolution engine until shutdown ─────────
    let engine_shutdown = shutdown_tx.subscribe();
    let engine_health = Arc::clone(&health_state);
    let engine_metrics = Arc::clone(&metrics);
    let engine_handle = tokio::spawn(async move {
        run_engine(
            distributor,
            rating_engine,
            resolution_rx,
            engine_metrics,
            engine_shutdown,
        )
        .await;
        engine_health
            .engine_running
            .store(false, std::sync::atomic::Ordering::Relaxed);
    });

    info!("All tasks spawned — arena core is running");

    // ── 10. Wait for SIGINT ─────────────────────────────────
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
    }

    let _ = shutdown_tx.send(());
    health_state
        .engine_running
        .store(false, std::sync::atomic::Ordering::Relaxed);

    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), engine_handle).await;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), health_handle).await;
    if let Some(handle) = metrics_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Event-driven resolution loop.
///
/// Each debate-resolved event settles the market and updates ratings
/// concurrently; the two touch disjoint entities.
async fn run_engine(
    distributor: PayoutDistributor<InMemoryStore, InMemoryStore, JsonlAuditLog>,
    rating_engine: RatingEngine<InMemoryStore, InMemoryStore>,
    mut resolution_rx: mpsc::Receiver<ResolutionEvent>,
    metrics: Arc<MetricsRegistry>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                info!("Engine received shutdown signal");
                break;
            }
            event = resolution_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_resolution(&distributor, &rating_engine, &metrics, event).await;
                    }
                    None => {
                        warn!("Resolution channel closed — engine stopping");
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(std::time::Duration::from_secs(30)) => {
                info!("Engine heartbeat — awaiting debate resolutions");
            }
        }
    }

    info!("Engine stopped cleanly");
}

/// Process one debate-resolved event.
async fn handle_resolution(
    distributor: &PayoutDistributor<InMemoryStore, InMemoryStore, JsonlAuditLog>,
    rating_engine: &RatingEngine<InMemoryStore, InMemoryStore>,
    metrics: &MetricsRegistry,
    event: ResolutionEvent,
) {
    metrics.resolutions_processed.inc();

    let payout_fut = async {
        match event.winner {
            Some(winner) => Some(distributor.distribute(&event.debate_id, winner).await),
            None => None,
        }
    };
    let rating_fut = rating_engine.update_ratings(&event.debate_id);

    let (payout_result, rating_result) = tokio::join!(payout_fut, rating_fut);

    match payout_result {
        Some(Ok(report)) => {
            metrics
                .wagers_settled
                .with_label_values(&["settled"])
                .inc_by(report.settled as u64);
            metrics
                .wagers_settled
                .with_label_values(&["skipped"])
                .inc_by(report.skipped as u64);
            metrics.points_paid.inc_by(report.points_paid as u64);
        }
        Some(Err(PayoutError::Incomplete { failed, total, .. })) => {
            metrics.payout_retries_pending.inc();
            error!(
                debate = %event.debate_id,
                failed,
                total,
                "Payout sweep incomplete — debate queued for retry"
            );
        }
        Some(Err(PayoutError::Store(e))) => {
            metrics.payout_retries_pending.inc();
            error!(debate = %event.debate_id, error = %e, "Payout sweep could not start");
        }
        None => {}
    }

    match rating_result {
        Ok(report) => {
            if report.crowd_applied {
                metrics.rating_updates.with_label_values(&["crowd"]).inc();
            }
            if report.ai_applied {
                metrics
                    .rating_updates
                    .with_label_values(&["ai_quality"])
                    .inc();
            }
        }
        Err(e) => {
            error!(debate = %event.debate_id, error = %e, "Rating update failed");
        }
    }
}
