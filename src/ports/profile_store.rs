//! Profile Store Port - User Profile Persistence Interface
//!
//! The profile store owns the point balance and cumulative betting
//! statistics. Balance mutation MUST be atomic at the storage layer:
//! the bet debit is a single conditional update ("decrement if balance
//! >= amount"), never a read-check-then-write pair, so two concurrent
//! bets from the same profile cannot lose an update.

use async_trait::async_trait;

use crate::domain::debate::{SessionId, UserId, UserProfile};

/// Result of an atomic conditional bet debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
  /// Balance was sufficient; the debit and stat increments were applied
  /// in one store operation.
  Applied {
    /// Balance after the debit.
    new_balance: i64,
  },
  /// Balance was below the wager; nothing was mutated.
  InsufficientFunds {
    /// Balance at the time of the rejected debit.
    balance: i64,
  },
}

/// Trait for user profile persistence providers.
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
  /// Fetch a profile, if one exists for the session.
  async fn get(&self, session_id: &SessionId) -> anyhow::Result<Option<UserProfile>>;

  /// Fetch the session's profile, creating it with the starting balance
  /// on first interaction.
  async fn get_or_create(
    &self,
    session_id: &SessionId,
    user_id: Option<UserId>,
    starting_balance: i64,
  ) -> anyhow::Result<UserProfile>;

  /// Atomically debit a wager and record it in the betting statistics.
  ///
  /// In one guarded update: `debate_points -= wager` (only if
  /// `debate_points >= wager`), `total_bets_placed += 1`,
  /// `total_points_wagered += wager`. Sufficiency is re-validated at
  /// commit time, not at read time.
  async fn apply_bet_debit(
    &self,
    session_id: &SessionId,
    wager: i64,
  ) -> anyhow::Result<DebitOutcome>;

  /// Atomically credit a winning payout: `debate_points += payout`,
  /// `total_bets_won += 1`, `total_points_won += payout`,
  /// `correct_predictions += 1`. Returns the updated profile so the
  /// caller can evaluate the superforecaster badge.
  async fn apply_payout_credit(
    &self,
    session_id: &SessionId,
    payout: i64,
  ) -> anyhow::Result<UserProfile>;

  /// Set the one-way superforecaster latch. Never unset.
  async fn flag_superforecaster(&self, session_id: &SessionId) -> anyhow::Result<()>;
}
