//! Vote Store Port - Vote/Bet Row Persistence Interface
//!
//! One row per vote or bet a session placed on a debate. Resolution
//! fields (`was_correct`, `payout_amount`) are written exactly once:
//! the store enforces the write-once guard so payout distribution can
//! be retried without double-paying.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::debate::{DebateId, SessionId, UserVote};

/// Trait for vote/bet persistence providers.
#[async_trait]
pub trait VoteStore: Send + Sync + 'static {
  /// Persist a new vote row.
  async fn insert(&self, vote: &UserVote) -> anyhow::Result<()>;

  /// All vote rows for a debate, wagered or not.
  async fn votes_for_debate(&self, debate_id: &DebateId) -> anyhow::Result<Vec<UserVote>>;

  /// Vote rows for a debate with `wager_amount > 0`.
  async fn wagers_for_debate(&self, debate_id: &DebateId) -> anyhow::Result<Vec<UserVote>>;

  /// Write resolution fields on a vote, once.
  ///
  /// Returns `true` if this call applied the resolution, `false` if the
  /// row was already resolved (the idempotency guard for payout retries).
  async fn mark_resolved(
    &self,
    vote_id: Uuid,
    was_correct: bool,
    payout_amount: i64,
  ) -> anyhow::Result<bool>;

  /// A session's vote rows, newest first, capped at `limit`.
  async fn votes_for_session(
    &self,
    session_id: &SessionId,
    limit: usize,
  ) -> anyhow::Result<Vec<UserVote>>;
}
