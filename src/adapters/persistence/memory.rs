//! In-Memory Store — Concrete Adapter for the Store Ports
//!
//! Implements `ProfileStore`, `VoteStore`, `ModelStore`, and
//! `DebateStore` over `tokio::sync::RwLock` maps. Conditional updates
//! (bet debit, write-once vote resolution) happen under a single write
//! lock acquisition, giving the same guarantee a SQL backend gets from
//! `UPDATE ... WHERE balance >= amount`.
//!
//! This is the store used by tests and single-process deployments; a
//! database-backed adapter implements the same ports per backend.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::debate::{
    Debate, DebateId, ModelId, ModelRecord, SessionId, UserId, UserProfile, UserVote,
};
use crate::ports::debate_store::DebateStore;
use crate::ports::model_store::ModelStore;
use crate::ports::profile_store::{DebitOutcome, ProfileStore};
use crate::ports::vote_store::VoteStore;

/// In-memory implementation of all four store ports.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<SessionId, UserProfile>>,
    votes: RwLock<HashMap<Uuid, UserVote>>,
    models: RwLock<HashMap<ModelId, ModelRecord>>,
    debates: RwLock<HashMap<DebateId, Debate>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a debate (test/wiring helper; debates are externally owned).
    pub async fn put_debate(&self, debate: Debate) {
        self.debates.write().await.insert(debate.id.clone(), debate);
    }

    /// Seed a model record (test/wiring helper).
    pub async fn put_model(&self, model: ModelRecord) {
        self.models.write().await.insert(model.id.clone(), model);
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get(&self, session_id: &SessionId) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(session_id).cloned())
    }

    async fn get_or_create(
        &self,
        session_id: &SessionId,
        user_id: Option<UserId>,
        starting_balance: i64,
    ) -> Result<UserProfile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(session_id.clone()).or_insert_with(|| {
            let mut p = UserProfile::new(session_id.clone(), starting_balance);
            p.user_id = user_id;
            p
        });
        Ok(profile.clone())
    }

    async fn apply_bet_debit(&self, session_id: &SessionId, wager: i64) -> Result<DebitOutcome> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(session_id)
            .ok_or_else(|| anyhow::anyhow!("No profile for session {session_id}"))?;

        // Sufficiency re-validated here, under the lock, at commit time.
        if profile.debate_points < wager {
            return Ok(DebitOutcome::InsufficientFunds {
                balance: profile.debate_points,
            });
        }
        profile.debate_points -= wager;
        profile.total_bets_placed += 1;
        profile.total_points_wagered += wager;
        Ok(DebitOutcome::Applied {
            new_balance: profile.debate_points,
        })
    }

    async fn apply_payout_credit(&self, session_id: &SessionId, payout: i64) -> Result<UserProfile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(session_id)
            .ok_or_else(|| anyhow::anyhow!("No profile for session {session_id}"))?;
        profile.debate_points += payout;
        profile.total_bets_won += 1;
        profile.total_points_won += payout;
        profile.correct_predictions += 1;
        Ok(profile.clone())
    }

    async fn flag_superforecaster(&self, session_id: &SessionId) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(session_id)
            .ok_or_else(|| anyhow::anyhow!("No profile for session {session_id}"))?;
        profile.is_superforecaster = true;
        Ok(())
    }
}

#[async_trait]
impl VoteStore for InMemoryStore {
    async fn insert(&self, vote: &UserVote) -> Result<()> {
        self.votes.write().await.insert(vote.id, vote.clone());
        Ok(())
    }

    async fn votes_for_debate(&self, debate_id: &DebateId) -> Result<Vec<UserVote>> {
        Ok(self
            .votes
            .read()
            .await
            .values()
            .filter(|v| &v.debate_id == debate_id)
            .cloned()
            .collect())
    }

    async fn wagers_for_debate(&self, debate_id: &DebateId) -> Result<Vec<UserVote>> {
        Ok(self
            .votes
            .read()
            .await
            .values()
            .filter(|v| &v.debate_id == debate_id && v.is_wager())
            .cloned()
            .collect())
    }

    async fn mark_resolved(
        &self,
        vote_id: Uuid,
        was_correct: bool,
        payout_amount: i64,
    ) -> Result<bool> {
        let mut votes = self.votes.write().await;
        let vote = votes
            .get_mut(&vote_id)
            .ok_or_else(|| anyhow::anyhow!("No vote {vote_id}"))?;

        // Write-once guard: a resolved row is never rewritten.
        if vote.is_resolved() {
            return Ok(false);
        }
        vote.was_correct = Some(was_correct);
        vote.payout_amount = payout_amount;
        Ok(true)
    }

    async fn votes_for_session(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<UserVote>> {
        let mut rows: Vec<UserVote> = self
            .votes
            .read()
            .await
            .values()
            .filter(|v| &v.session_id == session_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[async_trait]
impl ModelStore for InMemoryStore {
    async fn get(&self, model_id: &ModelId) -> Result<Option<ModelRecord>> {
        Ok(self.models.read().await.get(model_id).cloned())
    }

    async fn save(&self, model: &ModelRecord) -> Result<()> {
        self.models
            .write()
            .await
            .insert(model.id.clone(), model.clone());
        Ok(())
    }
}

#[async_trait]
impl DebateStore for InMemoryStore {
    async fn get(&self, debate_id: &DebateId) -> Result<Option<Debate>> {
        Ok(self.debates.read().await.get(debate_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = InMemoryStore::new();
        let session = "s1".to_string();
        let first = store.get_or_create(&session, None, 1000).await.unwrap();
        let again = store.get_or_create(&session, None, 1000).await.unwrap();
        assert_eq!(first.debate_points, 1000);
        assert_eq!(again.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_debit_rejects_insufficient_balance_without_mutation() {
        let store = InMemoryStore::new();
        let session = "s1".to_string();
        store.get_or_create(&session, None, 100).await.unwrap();

        let outcome = store.apply_bet_debit(&session, 200).await.unwrap();
        assert_eq!(outcome, DebitOutcome::InsufficientFunds { balance: 100 });

        let profile = ProfileStore::get(&store, &session).await.unwrap().unwrap();
        assert_eq!(profile.debate_points, 100);
        assert_eq!(profile.total_bets_placed, 0);
        assert_eq!(profile.total_points_wagered, 0);
    }

    #[tokio::test]
    async fn test_concurrent_debits_never_overdraw() {
        let store = Arc::new(InMemoryStore::new());
        let session = "racer".to_string();
        store.get_or_create(&session, None, 1000).await.unwrap();

        // Two concurrent 600-point debits against 1000: exactly one wins.
        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = Arc::clone(&store);
            let session = session.clone();
            handles.push(tokio::spawn(async move {
                store.apply_bet_debit(&session, 600).await.unwrap()
            }));
        }
        let mut applied = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), DebitOutcome::Applied { .. }) {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);

        let profile = ProfileStore::get(&*store, &session).await.unwrap().unwrap();
        assert_eq!(profile.debate_points, 400);
        assert!(profile.debate_points >= 0);
    }

    #[tokio::test]
    async fn test_mark_resolved_is_write_once() {
        let store = InMemoryStore::new();
        let vote = UserVote::new(
            "d1".to_string(),
            "s1".to_string(),
            None,
            crate::domain::debate::Outcome::Pro,
            50,
            rust_decimal_macros::dec!(2.00),
        );
        store.insert(&vote).await.unwrap();

        assert!(store.mark_resolved(vote.id, true, 100).await.unwrap());
        assert!(!store.mark_resolved(vote.id, true, 100).await.unwrap());

        let rows = store.votes_for_debate(&"d1".to_string()).await.unwrap();
        assert_eq!(rows[0].payout_amount, 100);
    }

    #[tokio::test]
    async fn test_session_history_newest_first_with_limit() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            let vote = UserVote::new(
                format!("d{i}"),
                "s1".to_string(),
                None,
                crate::domain::debate::Outcome::Con,
                20,
                rust_decimal_macros::dec!(2.00),
            );
            store.insert(&vote).await.unwrap();
        }
        let rows = store.votes_for_session(&"s1".to_string(), 3).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].placed_at >= rows[1].placed_at);
        assert!(rows[1].placed_at >= rows[2].placed_at);
    }
}
