//! Payout Distributor - Parimutuel Settlement of a Resolved Debate
//!
//! Once a debate resolves with a declared winner, walks every wagered
//! vote on it: marks correctness, pays winners at their snapshotted
//! odds, updates betting statistics, and evaluates the superforecaster
//! badge after each credit.
//!
//! Idempotency: the vote store's write-once resolution guard claims each
//! row; rows already resolved are skipped, so the sweep is safe to
//! re-run after a partial failure without double-paying anyone.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::domain::debate::{DebateId, Outcome, UserVote};
use crate::domain::odds::OddsCalculator;
use crate::ports::audit::{AuditLog, PayoutAuditRecord};
use crate::ports::profile_store::ProfileStore;
use crate::ports::vote_store::VoteStore;

/// Settlement failure surfaced to the caller for retry.
#[derive(Debug, Error)]
pub enum PayoutError {
  /// Some wagers could not be settled; the sweep should be retried.
  /// Already-settled rows are skipped on retry.
  #[error("payout for debate {debate_id} incomplete: {failed} of {total} wagers failed")]
  Incomplete {
    debate_id: String,
    failed: usize,
    total: usize,
  },
  /// The sweep could not start at all.
  #[error(transparent)]
  Store(#[from] anyhow::Error),
}

/// Summary of one settlement sweep.
#[derive(Debug, Clone)]
pub struct PayoutReport {
  /// Debate that was settled.
  pub debate_id: DebateId,
  /// Winning outcome bets settled against.
  pub winner: Outcome,
  /// Wagers settled in this sweep.
  pub settled: usize,
  /// Wagers skipped as already resolved (retries, concurrent sweeps).
  pub skipped: usize,
  /// Wagers that failed mid-settlement.
  pub failed: usize,
  /// Total points credited to winners.
  pub points_paid: i64,
}

/// Walks a resolved debate's wagers and credits the winners.
pub struct PayoutDistributor<P: ProfileStore, V: VoteStore, A: AuditLog> {
  profiles: Arc<P>,
  votes: Arc<V>,
  audit: Arc<A>,
  superforecaster_min_bets: u64,
  superforecaster_min_accuracy_pct: u64,
}

impl<P: ProfileStore, V: VoteStore, A: AuditLog> PayoutDistributor<P, V, A> {
  pub fn new(
    profiles: Arc<P>,
    votes: Arc<V>,
    audit: Arc<A>,
    superforecaster_min_bets: u64,
    superforecaster_min_accuracy_pct: u64,
  ) -> Self {
    Self {
      profiles,
      votes,
      audit,
      superforecaster_min_bets,
      superforecaster_min_accuracy_pct,
    }
  }

  /// Settle every wager on a resolved debate.
  ///
  /// Per-vote failures are logged and do not abort the sweep; if any
  /// vote failed, the whole call returns `PayoutError::Incomplete` so
  /// the caller retries the debate.
  #[instrument(skip(self), fields(debate = %debate_id, winner = %winner))]
  pub async fn distribute(
    &self,
    debate_id: &DebateId,
    winner: Outcome,
  ) -> Result<PayoutReport, PayoutError> {
    let wagers = self
      .votes
      .wagers_for_debate(debate_id)
      .await
      .context("Failed to load wagers for settlement")?;

    let total = wagers.len();
    let mut report = PayoutReport {
      debate_id: debate_id.clone(),
      winner,
      settled: 0,
      skipped: 0,
      failed: 0,
      points_paid: 0,
    };

    for vote in wagers {
      if vote.is_resolved() {
        report.skipped += 1;
        continue;
      }

      let was_correct = vote.vote == winner;
      let payout = if was_correct {
        OddsCalculator::payout(vote.wager_amount, vote.odds_at_bet)
      } else {
        0
      };

      match self.settle_vote(&vote, was_correct, payout).await {
        Ok(true) => {
          report.settled += 1;
          report.points_paid += payout;
        }
        Ok(false) => report.skipped += 1,
        Err(e) => {
          error!(
            vote_id = %vote.id,
            session = %vote.session_id,
            error = %e,
            "Failed to settle wager; will settle on retry"
          );
          report.failed += 1;
        }
      }
    }

    let audit_record = PayoutAuditRecord {
      debate_id: debate_id.clone(),
      winner: winner.to_string(),
      settled: report.settled,
      skipped: report.skipped,
      failed: report.failed,
      points_paid: report.points_paid,
      timestamp_ms: Utc::now().timestamp_millis() as u64,
    };
    if let Err(e) = self.audit.record_payout_sweep(&audit_record).await {
      warn!(error = %e, "Failed to write payout audit record");
    }

    info!(
      settled = report.settled,
      skipped = report.skipped,
      failed = report.failed,
      points_paid = report.points_paid,
      "Payout sweep complete"
    );

    if report.failed > 0 {
      return Err(PayoutError::Incomplete {
        debate_id: debate_id.clone(),
        failed: report.failed,
        total,
      });
    }
    Ok(report)
  }

  /// Settle one wager: claim the row, then credit the winner.
  ///
  /// The write-once resolution is the claim; a row that was already
  /// resolved (returning `false`) belongs to an earlier sweep and is
  /// never credited again.
  async fn settle_vote(&self, vote: &UserVote, was_correct: bool, payout: i64) -> Result<bool> {
    let claimed = self
      .votes
      .mark_resolved(vote.id, was_correct, payout)
      .await
      .context("Failed to write vote resolution")?;
    if !claimed {
      return Ok(false);
    }

    if payout > 0 {
      let profile = self
        .profiles
        .apply_payout_credit(&vote.session_id, payout)
        .await
        .context("Failed to credit winning wager")?;

      if !profile.is_superforecaster
        && profile.qualifies_superforecaster(
          self.superforecaster_min_bets,
          self.superforecaster_min_accuracy_pct,
        )
      {
        self
          .profiles
          .flag_superforecaster(&vote.session_id)
          .await
          .context("Failed to flag superforecaster")?;
        info!(
          session = %vote.session_id,
          bets = profile.total_bets_placed,
          correct = profile.correct_predictions,
          "Superforecaster badge earned"
        );
      }
    }

    Ok(true)
  }
}
