//! User Stats - Profile Statistics and Betting History
//!
//! Read-side derivations over the profile and vote stores: the stats
//! block the dashboard shows per session, and the session's wager
//! history joined with debate topics.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MarketConfig;
use crate::domain::debate::{Outcome, SessionId};
use crate::ports::debate_store::DebateStore;
use crate::ports::profile_store::ProfileStore;
use crate::ports::vote_store::VoteStore;

/// Aggregate statistics for one session's profile.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
  pub debate_points: i64,
  pub total_bets_placed: u64,
  pub total_bets_won: u64,
  pub correct_predictions: u64,
  /// Percent of placed bets predicted correctly (0 if no bets).
  pub accuracy: f64,
  /// Percent return on points wagered (0 if never wagered).
  pub roi: f64,
  pub is_superforecaster: bool,
  pub total_points_wagered: i64,
  pub total_points_won: i64,
  /// `total_points_won - total_points_wagered`.
  pub net_profit: i64,
}

/// One past wager, as shown in the betting history view.
#[derive(Debug, Clone, Serialize)]
pub struct BetHistoryEntry {
  pub debate_id: String,
  /// Debate topic, or a placeholder if the debate is gone.
  pub topic: String,
  pub vote: Outcome,
  pub wager: i64,
  pub odds: Decimal,
  pub payout: i64,
  /// None while the debate is unresolved.
  pub was_correct: Option<bool>,
  /// `payout - wager` once resolved, 0 while pending.
  pub profit: i64,
  pub placed_at: DateTime<Utc>,
}

/// Read-side service over the profile, vote, and debate stores.
pub struct UserStatsService<P: ProfileStore, V: VoteStore, D: DebateStore> {
  profiles: Arc<P>,
  votes: Arc<V>,
  debates: Arc<D>,
  starting_balance: i64,
}

impl<P: ProfileStore, V: VoteStore, D: DebateStore> UserStatsService<P, V, D> {
  pub fn new(profiles: Arc<P>, votes: Arc<V>, debates: Arc<D>, market: &MarketConfig) -> Self {
    Self {
      profiles,
      votes,
      debates,
      starting_balance: market.starting_balance,
    }
  }

  /// Stats for a session, creating the profile on first interaction.
  pub async fn user_stats(&self, session_id: &SessionId) -> Result<UserStats> {
    let profile = self
      .profiles
      .get_or_create(session_id, None, self.starting_balance)
      .await
      .context("Failed to resolve profile for stats")?;

    Ok(UserStats {
      debate_points: profile.debate_points,
      total_bets_placed: profile.total_bets_placed,
      total_bets_won: profile.total_bets_won,
      correct_predictions: profile.correct_predictions,
      accuracy: profile.accuracy_pct(),
      roi: profile.roi_pct(),
      is_superforecaster: profile.is_superforecaster,
      total_points_wagered: profile.total_points_wagered,
      total_points_won: profile.total_points_won,
      net_profit: profile.total_points_won - profile.total_points_wagered,
    })
  }

  /// A session's past wagers, newest first, joined with debate topics.
  ///
  /// Vote-only rows carry no market exposure and are excluded.
  pub async fn betting_history(
    &self,
    session_id: &SessionId,
    limit: usize,
  ) -> Result<Vec<BetHistoryEntry>> {
    let votes = self
      .votes
      .votes_for_session(session_id, limit)
      .await
      .context("Failed to load session votes")?;

    let mut entries = Vec::with_capacity(votes.len());
    for vote in votes.into_iter().filter(|v| v.is_wager()) {
      let topic = match self.debates.get(&vote.debate_id).await {
        Ok(Some(debate)) => debate.topic,
        Ok(None) => "(debate removed)".to_string(),
        Err(e) => {
          tracing::warn!(debate = %vote.debate_id, error = %e, "Failed to load debate for history");
          "(unavailable)".to_string()
        }
      };

      let profit = if vote.is_resolved() {
        vote.payout_amount - vote.wager_amount
      } else {
        0
      };

      entries.push(BetHistoryEntry {
        debate_id: vote.debate_id,
        topic,
        vote: vote.vote,
        wager: vote.wager_amount,
        odds: vote.odds_at_bet,
        payout: vote.payout_amount,
        was_correct: vote.was_correct,
        profit,
        placed_at: vote.placed_at,
      });
    }

    Ok(entries)
  }
}
