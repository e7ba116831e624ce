//! Rating Engine - Dual-Track Glicko-2 Updates
//!
//! Maintains two independent skill ratings per model, updated once per
//! completed debate:
//! - Crowd track, scored by the human vote verdict (`crowd_winner`)
//! - AI-quality track, scored by the AI judge (`ai_judge_winner`)
//!
//! Both tracks run the same Glicko-2 pairwise update. The crowd track
//! persists no volatility, so it uses the configured system volatility
//! on every update; the AI track evolves its own. Idle models have
//! their deviation inflated before the update, one rating period at a
//! time. A failure saving one model never blocks the other's save.
//!
//! Also exposes the read-only diagnostics derived from the two tracks
//! (controversy and charismatic-liar indices) for the leaderboard.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, instrument};

use crate::config::RatingConfig;
use crate::domain::debate::{DebateId, MatchResult, ModelId, ModelRecord};
use crate::domain::diagnostics;
use crate::domain::glicko::{GlickoRating, GlickoSystem};
use crate::ports::debate_store::DebateStore;
use crate::ports::model_store::ModelStore;

/// Summary of one debate's rating update.
#[derive(Debug, Clone)]
pub struct RatingUpdateReport {
  /// Debate the update was computed from.
  pub debate_id: DebateId,
  /// Whether the crowd track had a verdict to score.
  pub crowd_applied: bool,
  /// Whether the AI-quality track had a verdict to score.
  pub ai_applied: bool,
}

/// Read-only diagnostic snapshot for one model.
#[derive(Debug, Clone, Copy)]
pub struct ModelDiagnostics {
  /// Absolute crowd/AI rating gap.
  pub controversy_index: f64,
  /// Whether the gap exceeds the configured threshold.
  pub is_controversial: bool,
  /// Crowd surplus on the normalized 0-100 scale, floored at zero.
  pub charismatic_liar_index: f64,
}

/// Applies Glicko-2 updates to the two participating models of a debate.
pub struct RatingEngine<M: ModelStore, D: DebateStore> {
  models: Arc<M>,
  debates: Arc<D>,
  system: GlickoSystem,
  rating_period_days: f64,
  controversy_threshold: f64,
}

impl<M: ModelStore, D: DebateStore> RatingEngine<M, D> {
  /// Create a rating engine from rating configuration.
  pub fn new(models: Arc<M>, debates: Arc<D>, config: &RatingConfig) -> Self {
    Self {
      models,
      debates,
      system: GlickoSystem::new(
        config.tau,
        config.initial_rating,
        config.initial_deviation,
        config.min_deviation,
        config.default_volatility,
      ),
      rating_period_days: config.rating_period_days,
      controversy_threshold: config.controversy_threshold,
    }
  }

  /// Apply both tracks' updates for a completed debate.
  ///
  /// A track with no verdict (null `crowd_winner`/`ai_judge_winner`) is
  /// skipped; win/loss/tie tallies follow the overall `winner`. Both
  /// model saves are attempted even if the first fails.
  #[instrument(skip(self), fields(debate = %debate_id))]
  pub async fn update_ratings(&self, debate_id: &DebateId) -> Result<RatingUpdateReport> {
    let debate = self
      .debates
      .get(debate_id)
      .await
      .context("Failed to load debate")?
      .with_context(|| format!("Unknown debate: {debate_id}"))?;

    anyhow::ensure!(
      debate.status == crate::domain::debate::DebateStatus::Completed,
      "Debate {debate_id} is not completed (status {:?})",
      debate.status
    );

    let mut pro = self
      .fetch_model(&debate.pro_model_id)
      .await
      .context("Failed to load pro-side model")?;
    let mut con = self
      .fetch_model(&debate.con_model_id)
      .await
      .context("Failed to load con-side model")?;

    let now = Utc::now();
    let pro_idle = self.idle_periods(&pro, now);
    let con_idle = self.idle_periods(&con, now);

    let crowd_applied = if let Some(verdict) = debate.crowd_winner {
      self.apply_crowd_track(&mut pro, &mut con, pro_idle, con_idle, verdict);
      true
    } else {
      false
    };

    let ai_applied = if let Some(verdict) = debate.ai_judge_winner {
      self.apply_ai_track(&mut pro, &mut con, pro_idle, con_idle, verdict);
      true
    } else {
      false
    };

    if let Some(winner) = debate.winner {
      let pro_result = MatchResult::for_pro_side(winner);
      pro.record_result(pro_result);
      con.record_result(pro_result.inverse());
    }

    pro.last_rated_at = Some(now);
    con.last_rated_at = Some(now);

    // Saves are independent sub-operations: one model's failure must
    // not block the other's update.
    let mut save_errors = Vec::new();
    for model in [&pro, &con] {
      if let Err(e) = self.models.save(model).await {
        error!(model = %model.id, error = %e, "Failed to save rating update");
        save_errors.push(format!("{}: {e}", model.id));
      }
    }
    anyhow::ensure!(
      save_errors.is_empty(),
      "Rating update for debate {debate_id} failed to save: {}",
      save_errors.join("; ")
    );

    info!(
      pro_model = %pro.id,
      con_model = %con.id,
      crowd_applied,
      ai_applied,
      pro_crowd = pro.crowd_rating,
      con_crowd = con.crowd_rating,
      pro_ai = pro.ai_quality_rating,
      con_ai = con.ai_quality_rating,
      "Ratings updated"
    );

    Ok(RatingUpdateReport {
      debate_id: debate_id.clone(),
      crowd_applied,
      ai_applied,
    })
  }

  /// Crowd/AI rating gap for a model.
  pub async fn controversy_index(&self, model_id: &ModelId) -> Result<f64> {
    let model = self.fetch_model(model_id).await?;
    Ok(diagnostics::controversy_index(
      model.crowd_rating,
      model.ai_quality_rating,
    ))
  }

  /// Crowd surplus index for a model.
  pub async fn charismatic_liar_index(&self, model_id: &ModelId) -> Result<f64> {
    let model = self.fetch_model(model_id).await?;
    Ok(diagnostics::charismatic_liar_index(
      model.crowd_rating,
      model.ai_quality_rating,
    ))
  }

  /// Full diagnostic snapshot for a model.
  pub async fn diagnostics(&self, model_id: &ModelId) -> Result<ModelDiagnostics> {
    let model = self.fetch_model(model_id).await?;
    Ok(ModelDiagnostics {
      controversy_index: diagnostics::controversy_index(
        model.crowd_rating,
        model.ai_quality_rating,
      ),
      is_controversial: diagnostics::is_controversial(
        model.crowd_rating,
        model.ai_quality_rating,
        self.controversy_threshold,
      ),
      charismatic_liar_index: diagnostics::charismatic_liar_index(
        model.crowd_rating,
        model.ai_quality_rating,
      ),
    })
  }

  async fn fetch_model(&self, model_id: &ModelId) -> Result<ModelRecord> {
    self
      .models
      .get(model_id)
      .await
      .context("Failed to load model")?
      .with_context(|| format!("Unknown model: {model_id}"))
  }

  /// Whole-or-fractional rating periods since the model last rated.
  fn idle_periods(&self, model: &ModelRecord, now: chrono::DateTime<Utc>) -> f64 {
    match model.last_rated_at {
      Some(last) => {
        let days = (now - last).num_seconds() as f64 / 86_400.0;
        (days / self.rating_period_days).max(0.0)
      }
      None => 0.0,
    }
  }

  fn apply_crowd_track(
    &self,
    pro: &mut ModelRecord,
    con: &mut ModelRecord,
    pro_idle: f64,
    con_idle: f64,
    verdict: crate::domain::debate::Outcome,
  ) {
    let pro_rating = self.system.decay_idle(
      GlickoRating {
        rating: pro.crowd_rating,
        deviation: pro.crowd_rating_deviation,
        volatility: self.system.default_volatility(),
      },
      pro_idle,
    );
    let con_rating = self.system.decay_idle(
      GlickoRating {
        rating: con.crowd_rating,
        deviation: con.crowd_rating_deviation,
        volatility: self.system.default_volatility(),
      },
      con_idle,
    );

    let (new_pro, new_con) =
      self
        .system
        .rate_pair(pro_rating, con_rating, MatchResult::for_pro_side(verdict));

    pro.crowd_rating = new_pro.rating;
    pro.crowd_rating_deviation = new_pro.deviation;
    con.crowd_rating = new_con.rating;
    con.crowd_rating_deviation = new_con.deviation;
  }

  fn apply_ai_track(
    &self,
    pro: &mut ModelRecord,
    con: &mut ModelRecord,
    pro_idle: f64,
    con_idle: f64,
    verdict: crate::domain::debate::Outcome,
  ) {
    let pro_rating = self.system.decay_idle(
      GlickoRating {
        rating: pro.ai_quality_rating,
        deviation: pro.ai_quality_rating_deviation,
        volatility: pro.ai_quality_volatility,
      },
      pro_idle,
    );
    let con_rating = self.system.decay_idle(
      GlickoRating {
        rating: con.ai_quality_rating,
        deviation: con.ai_quality_rating_deviation,
        volatility: con.ai_quality_volatility,
      },
      con_idle,
    );

    let (new_pro, new_con) =
      self
        .system
        .rate_pair(pro_rating, con_rating, MatchResult::for_pro_side(verdict));

    pro.ai_quality_rating = new_pro.rating;
    pro.ai_quality_rating_deviation = new_pro.deviation;
    pro.ai_quality_volatility = new_pro.volatility;
    con.ai_quality_rating = new_con.rating;
    con.ai_quality_rating_deviation = new_con.deviation;
    con.ai_quality_volatility = new_con.volatility;
  }
}
