//! Bet Ledger - Wager Validation and Recording
//!
//! The single write path for wagers:
//! - Validates the wager amount and backed outcome
//! - Resolves (or lazily creates) the bettor's profile
//! - Atomically debits the balance via the profile store's guarded update
//! - Snapshots the odds in effect at bet time and persists the vote row
//!
//! Validation failures and insufficient funds return an unsuccessful
//! `BetResult` with a message and mutate nothing; only store failures
//! surface as `Err`.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use tracing::{info, instrument, warn};

use crate::config::MarketConfig;
use crate::domain::debate::{DebateId, Outcome, SessionId, UserId, UserVote};
use crate::domain::odds::{OddsCalculator, OddsTable};
use crate::domain::pool::BetPool;
use crate::ports::audit::{AuditLog, BetAuditRecord};
use crate::ports::profile_store::{DebitOutcome, ProfileStore};
use crate::ports::vote_store::VoteStore;

/// Outcome of a bet attempt, always carrying a displayable message.
#[derive(Debug, Clone)]
pub struct BetResult {
  /// Whether the wager was accepted and recorded.
  pub success: bool,
  /// Balance after the attempt, where known.
  pub new_balance: Option<i64>,
  /// Odds snapshot for the backed outcome, on success.
  pub odds: Option<Decimal>,
  /// Message the caller can display directly.
  pub message: String,
}

impl BetResult {
  fn rejected(message: String) -> Self {
    Self {
      success: false,
      new_balance: None,
      odds: None,
      message,
    }
  }
}

/// Validates and records wagers against the injected stores.
pub struct BetLedger<P: ProfileStore, V: VoteStore, A: AuditLog> {
  profiles: Arc<P>,
  votes: Arc<V>,
  audit: Arc<A>,
  odds: OddsCalculator,
  min_wager: i64,
  max_wager: i64,
  starting_balance: i64,
}

impl<P: ProfileStore, V: VoteStore, A: AuditLog> BetLedger<P, V, A> {
  /// Create a ledger from market configuration.
  pub fn new(profiles: Arc<P>, votes: Arc<V>, audit: Arc<A>, market: &MarketConfig) -> Self {
    let house_edge = Decimal::from_f64(market.house_edge).unwrap_or(dec!(0.05));
    let min_odds = Decimal::from_f64(market.min_odds).unwrap_or(dec!(1.1));
    Self {
      profiles,
      votes,
      audit,
      odds: OddsCalculator::new(house_edge, min_odds),
      min_wager: market.min_wager,
      max_wager: market.max_wager,
      starting_balance: market.starting_balance,
    }
  }

  /// Current per-outcome wager totals for a debate.
  ///
  /// Recomputed from current rows on every call so the result reflects
  /// the latest committed bets.
  pub async fn bet_pool(&self, debate_id: &DebateId) -> Result<BetPool> {
    let votes = self
      .votes
      .votes_for_debate(debate_id)
      .await
      .context("Failed to load votes for pool aggregation")?;
    Ok(BetPool::from_votes(&votes))
  }

  /// Current odds quote for a debate.
  ///
  /// Display only — the snapshot captured inside `place_bet` is what
  /// pays out, not whatever was quoted afterward.
  pub async fn current_odds(&self, debate_id: &DebateId) -> Result<OddsTable> {
    let pool = self.bet_pool(debate_id).await?;
    Ok(self.odds.quote(&pool))
  }

  /// Place a wager on a debate outcome.
  ///
  /// Preconditions are checked in order, first failure wins, no side
  /// effects on failure: wager range, then profile resolution, then the
  /// atomic balance debit.
  #[instrument(skip(self), fields(debate = %debate_id, session = %session_id, wager))]
  pub async fn place_bet(
    &self,
    debate_id: &DebateId,
    session_id: &SessionId,
    vote: &str,
    wager: i64,
    user_id: Option<UserId>,
  ) -> Result<BetResult> {
    if wager < self.min_wager || wager > self.max_wager {
      return Ok(BetResult::rejected(format!(
        "Wager must be between {} and {} points, got {wager}",
        self.min_wager, self.max_wager
      )));
    }

    let Some(outcome) = Outcome::parse(vote) else {
      return Ok(BetResult::rejected(format!(
        "Unknown outcome {vote:?}: expected pro, con, or tie"
      )));
    };

    // Quote against the pool as it stands, excluding this wager.
    let pool = self.bet_pool(debate_id).await?;
    let odds_snapshot = self.odds.quote(&pool).for_outcome(outcome);

    let profile = self
      .profiles
      .get_or_create(session_id, user_id.clone(), self.starting_balance)
      .await
      .context("Failed to resolve bettor profile")?;

    let new_balance = match self
      .profiles
      .apply_bet_debit(session_id, wager)
      .await
      .context("Failed to apply bet debit")?
    {
      DebitOutcome::Applied { new_balance } => new_balance,
      DebitOutcome::InsufficientFunds { balance } => {
        return Ok(BetResult {
          success: false,
          new_balance: Some(balance),
          odds: None,
          message: format!(
            "Insufficient points: balance {balance}, wager {wager} (short {})",
            wager - balance
          ),
        });
      }
    };

    let row = UserVote::new(
      debate_id.clone(),
      session_id.clone(),
      user_id,
      outcome,
      wager,
      odds_snapshot,
    );
    self
      .votes
      .insert(&row)
      .await
      .context("Failed to persist vote row after debit")?;

    let audit_record = BetAuditRecord {
      vote_id: row.id.to_string(),
      debate_id: debate_id.clone(),
      session_id: session_id.clone(),
      vote: outcome.to_string(),
      wager,
      odds: odds_snapshot.to_f64().unwrap_or(0.0),
      new_balance,
      timestamp_ms: Utc::now().timestamp_millis() as u64,
    };
    if let Err(e) = self.audit.record_bet(&audit_record).await {
      warn!(error = %e, vote_id = %row.id, "Failed to write bet audit record");
    }

    info!(
      vote_id = %row.id,
      outcome = %outcome,
      odds = %odds_snapshot,
      new_balance,
      prior_balance = profile.debate_points,
      "Bet placed"
    );

    Ok(BetResult {
      success: true,
      new_balance: Some(new_balance),
      odds: Some(odds_snapshot),
      message: format!("Bet placed: {wager} points on {outcome} at {odds_snapshot}x"),
    })
  }
}
