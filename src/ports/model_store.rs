//! Model Store Port - Model Record Persistence Interface
//!
//! Model records (identity, both rating tracks, match tallies) are
//! mutated only by the rating engine, once per completed debate the
//! model participated in.

use async_trait::async_trait;

use crate::domain::debate::{ModelId, ModelRecord};

/// Trait for model record persistence providers.
#[async_trait]
pub trait ModelStore: Send + Sync + 'static {
  /// Fetch a model record.
  async fn get(&self, model_id: &ModelId) -> anyhow::Result<Option<ModelRecord>>;

  /// Persist a model record (full overwrite of mutable fields).
  async fn save(&self, model: &ModelRecord) -> anyhow::Result<()>;
}
