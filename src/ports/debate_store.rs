//! Debate Store Port - Read-Only Debate Access
//!
//! Debates are owned by the external orchestrator; this core only reads
//! them — to quote odds, join topics into betting history, and consume
//! the terminal verdict.

use async_trait::async_trait;

use crate::domain::debate::{Debate, DebateId};

/// Trait for read-only debate access.
#[async_trait]
pub trait DebateStore: Send + Sync + 'static {
  /// Fetch a debate snapshot.
  async fn get(&self, debate_id: &DebateId) -> anyhow::Result<Option<Debate>>;
}
