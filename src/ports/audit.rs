//! Audit Log Port - Append-Only Market Event Records
//!
//! Best-effort audit trail of market activity (bets placed, payout
//! sweeps) in JSONL form. Audit failures are logged and never fail the
//! operation that produced the event.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A placed bet, as recorded in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetAuditRecord {
  /// Vote row ID.
  pub vote_id: String,
  /// Debate the bet was placed on.
  pub debate_id: String,
  /// Session that placed the bet.
  pub session_id: String,
  /// Backed outcome.
  pub vote: String,
  /// Points wagered.
  pub wager: i64,
  /// Odds multiplier snapshotted at bet time.
  pub odds: f64,
  /// Bettor balance after the debit.
  pub new_balance: i64,
  /// Timestamp (Unix ms).
  pub timestamp_ms: u64,
}

/// Summary of one payout sweep, as recorded in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutAuditRecord {
  /// Debate that resolved.
  pub debate_id: String,
  /// Winning outcome.
  pub winner: String,
  /// Wagers settled in this sweep.
  pub settled: usize,
  /// Wagers skipped as already resolved.
  pub skipped: usize,
  /// Wagers that failed and will be retried.
  pub failed: usize,
  /// Total points credited to winners.
  pub points_paid: i64,
  /// Timestamp (Unix ms).
  pub timestamp_ms: u64,
}

/// Trait for audit trail providers.
#[async_trait]
pub trait AuditLog: Send + Sync + 'static {
  /// Append a placed-bet record.
  async fn record_bet(&self, record: &BetAuditRecord) -> anyhow::Result<()>;

  /// Append a payout sweep summary.
  async fn record_payout_sweep(&self, record: &PayoutAuditRecord) -> anyhow::Result<()>;

  /// Check if the audit sink is writable.
  async fn is_healthy(&self) -> bool;
}
