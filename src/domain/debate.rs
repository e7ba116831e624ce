//! Core arena domain types.
//!
//! Defines all business entities: debates, outcomes, votes, user profiles,
//! and model records. These types are the foundation of the hexagonal
//! architecture's inner ring.
//!
//! Points are integral (`i64`) — the platform's virtual currency is whole
//! DebatePoints, never fractional. Odds use `Decimal` for exact 2-dp math.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────
// Type aliases consumed by ports and usecases
// ────────────────────────────────────────────

/// Lightweight debate identifier used at the ports boundary.
pub type DebateId = String;

/// Lightweight session identifier (anonymous bettor handle).
pub type SessionId = String;

/// Lightweight authenticated-user identifier.
pub type UserId = String;

/// Lightweight model identifier used at the ports boundary.
pub type ModelId = String;

// ────────────────────────────────────────────
// Enums shared across domain and ports
// ────────────────────────────────────────────

/// A debate outcome — the three things a vote or wager can back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The pro-side model wins.
    Pro,
    /// The con-side model wins.
    Con,
    /// The debate is judged a draw.
    Tie,
}

impl Outcome {
    /// Parse a boundary string ("pro"/"con"/"tie", case-insensitive).
    ///
    /// Malformed values are a validation error, reported to the caller
    /// with the offending input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pro" => Some(Self::Pro),
            "con" => Some(Self::Con),
            "tie" => Some(Self::Tie),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
            Self::Tie => write!(f, "tie"),
        }
    }
}

/// Lifecycle status of a debate.
///
/// `Completed` and `Failed` are terminal; the market and rating engines
/// only act on the transition into `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStatus {
    /// Scheduled, no arguments generated yet.
    Pending,
    /// Rounds are being generated / voted on.
    InProgress,
    /// Finished with a declared verdict.
    Completed,
    /// Aborted by the orchestrator.
    Failed,
}

impl DebateStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

// ────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────

/// A debate between two models, read-only from this crate's perspective.
///
/// The orchestrator owns the lifecycle and verdicts; this core only
/// consumes the terminal snapshot to settle bets and update ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debate {
    /// Unique debate identifier.
    pub id: DebateId,
    /// Debate topic, joined into betting history entries.
    pub topic: String,
    /// Model arguing the pro side.
    pub pro_model_id: ModelId,
    /// Model arguing the con side.
    pub con_model_id: ModelId,
    /// Lifecycle status.
    pub status: DebateStatus,
    /// Parimutuel resolution (what bets settle against).
    pub winner: Option<Outcome>,
    /// Human vote verdict (crowd rating track).
    pub crowd_winner: Option<Outcome>,
    /// AI judge verdict (AI-quality rating track).
    pub ai_judge_winner: Option<Outcome>,
    /// Human vote tally for the pro side.
    pub pro_votes: u64,
    /// Human vote tally for the con side.
    pub con_votes: u64,
    /// Human vote tally for a tie.
    pub tie_votes: u64,
    /// When the debate reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

/// One row per vote/bet a session placed on a debate.
///
/// `wager_amount == 0` is a vote-only row with no market exposure.
/// `was_correct`/`payout_amount` are written exactly once, by the
/// payout distributor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserVote {
    /// Internal vote ID.
    pub id: Uuid,
    /// Debate this vote belongs to.
    pub debate_id: DebateId,
    /// Session that placed the vote.
    pub session_id: SessionId,
    /// Authenticated user, once the session is linked.
    pub user_id: Option<UserId>,
    /// Backed outcome.
    pub vote: Outcome,
    /// Points wagered (0 = vote only).
    pub wager_amount: i64,
    /// Odds multiplier snapshotted at bet time — authoritative for payout.
    pub odds_at_bet: Decimal,
    /// Points credited on resolution (0 until resolved or if wrong).
    pub payout_amount: i64,
    /// None until the debate resolves.
    pub was_correct: Option<bool>,
    /// When the vote was placed.
    pub placed_at: DateTime<Utc>,
}

impl UserVote {
    /// Create a fresh unresolved vote row.
    pub fn new(
        debate_id: DebateId,
        session_id: SessionId,
        user_id: Option<UserId>,
        vote: Outcome,
        wager_amount: i64,
        odds_at_bet: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            debate_id,
            session_id,
            user_id,
            vote,
            wager_amount,
            odds_at_bet,
            payout_amount: 0,
            was_correct: None,
            placed_at: Utc::now(),
        }
    }

    /// Whether this row carries market exposure.
    pub fn is_wager(&self) -> bool {
        self.wager_amount > 0
    }

    /// Whether the payout distributor already processed this row.
    pub fn is_resolved(&self) -> bool {
        self.was_correct.is_some()
    }
}

/// A bettor's profile: point balance plus cumulative betting statistics.
///
/// Created lazily on first interaction with a 1000-point starting balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Session this profile belongs to.
    pub session_id: SessionId,
    /// Authenticated user, once linked.
    pub user_id: Option<UserId>,
    /// Current point balance. Invariant: never negative.
    pub debate_points: i64,
    /// Lifetime count of wagers placed.
    pub total_bets_placed: u64,
    /// Lifetime count of wagers that paid out.
    pub total_bets_won: u64,
    /// Lifetime count of correct predictions.
    pub correct_predictions: u64,
    /// Lifetime points wagered.
    pub total_points_wagered: i64,
    /// Lifetime points won.
    pub total_points_won: i64,
    /// One-way badge: once true, never reset.
    pub is_superforecaster: bool,
    /// Profile creation time.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a fresh profile with the given starting balance.
    pub fn new(session_id: SessionId, starting_balance: i64) -> Self {
        Self {
            session_id,
            user_id: None,
            debate_points: starting_balance,
            total_bets_placed: 0,
            total_bets_won: 0,
            correct_predictions: 0,
            total_points_wagered: 0,
            total_points_won: 0,
            is_superforecaster: false,
            created_at: Utc::now(),
        }
    }

    /// Prediction accuracy in percent (0 if no bets placed).
    pub fn accuracy_pct(&self) -> f64 {
        if self.total_bets_placed == 0 {
            return 0.0;
        }
        self.correct_predictions as f64 / self.total_bets_placed as f64 * 100.0
    }

    /// Return on investment in percent (0 if never wagered).
    pub fn roi_pct(&self) -> f64 {
        if self.total_points_wagered == 0 {
            return 0.0;
        }
        (self.total_points_won - self.total_points_wagered) as f64
            / self.total_points_wagered as f64
            * 100.0
    }

    /// Whether this profile qualifies for the superforecaster badge.
    ///
    /// Integer math: `correct × 100 ≥ placed × 80` sidesteps float
    /// comparison exactly at the 80% boundary.
    pub fn qualifies_superforecaster(&self, min_bets: u64, min_accuracy_pct: u64) -> bool {
        self.total_bets_placed >= min_bets
            && self.correct_predictions * 100 >= self.total_bets_placed * min_accuracy_pct
    }
}

/// A competing model with its two skill-rating tracks and match tallies.
///
/// Mutated only by the rating engine, once per completed debate the
/// model participated in. Invariant: `wins + losses + ties == total_debates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Unique model identifier.
    pub id: ModelId,
    /// Display name.
    pub name: String,
    /// Provider (e.g. "openai", "anthropic").
    pub provider: String,
    /// Crowd-track rating (human votes).
    pub crowd_rating: f64,
    /// Crowd-track rating deviation.
    pub crowd_rating_deviation: f64,
    /// AI-quality-track rating (AI judge verdicts).
    pub ai_quality_rating: f64,
    /// AI-quality-track rating deviation.
    pub ai_quality_rating_deviation: f64,
    /// AI-quality-track volatility.
    pub ai_quality_volatility: f64,
    /// Completed debates this model was rated on.
    pub total_debates: u64,
    /// Overall wins.
    pub wins: u64,
    /// Overall losses.
    pub losses: u64,
    /// Overall ties.
    pub ties: u64,
    /// When this model was last rated; drives deviation inflation on idleness.
    pub last_rated_at: Option<DateTime<Utc>>,
}

impl ModelRecord {
    /// Create a new model at the rating system's initial values.
    pub fn new(
        id: ModelId,
        name: String,
        provider: String,
        initial_rating: f64,
        initial_deviation: f64,
        initial_volatility: f64,
    ) -> Self {
        Self {
            id,
            name,
            provider,
            crowd_rating: initial_rating,
            crowd_rating_deviation: initial_deviation,
            ai_quality_rating: initial_rating,
            ai_quality_rating_deviation: initial_deviation,
            ai_quality_volatility: initial_volatility,
            total_debates: 0,
            wins: 0,
            losses: 0,
            ties: 0,
            last_rated_at: None,
        }
    }

    /// Record one completed debate in the win/loss/tie tallies.
    pub fn record_result(&mut self, outcome_for_model: MatchResult) {
        self.total_debates += 1;
        match outcome_for_model {
            MatchResult::Win => self.wins += 1,
            MatchResult::Loss => self.losses += 1,
            MatchResult::Tie => self.ties += 1,
        }
    }
}

/// Debate-resolved event consumed from the orchestrator.
///
/// `winner` settles the market; `crowd_winner`/`ai_judge_winner` drive
/// the two rating tracks. This core never decides winners, only
/// consumes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionEvent {
    /// Debate that reached a terminal state.
    pub debate_id: DebateId,
    /// Parimutuel resolution, if the market should settle.
    pub winner: Option<Outcome>,
    /// Human vote verdict, if the crowd track should update.
    pub crowd_winner: Option<Outcome>,
    /// AI judge verdict, if the AI-quality track should update.
    pub ai_judge_winner: Option<Outcome>,
}

/// A debate result from one participant's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
    Tie,
}

impl MatchResult {
    /// Glicko score for this result (tie counts 0.5 for both sides).
    pub fn score(self) -> f64 {
        match self {
            Self::Win => 1.0,
            Self::Loss => 0.0,
            Self::Tie => 0.5,
        }
    }

    /// The opponent's result in the same debate.
    pub fn inverse(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
            Self::Tie => Self::Tie,
        }
    }

    /// Map a debate-level outcome to the pro-side model's result.
    pub fn for_pro_side(winner: Outcome) -> Self {
        match winner {
            Outcome::Pro => Self::Win,
            Outcome::Con => Self::Loss,
            Outcome::Tie => Self::Tie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_parse_roundtrip() {
        assert_eq!(Outcome::parse("pro"), Some(Outcome::Pro));
        assert_eq!(Outcome::parse("CON"), Some(Outcome::Con));
        assert_eq!(Outcome::parse("Tie"), Some(Outcome::Tie));
        assert_eq!(Outcome::parse("yes"), None);
        assert_eq!(Outcome::parse(""), None);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(format!("{}", Outcome::Pro), "pro");
        assert_eq!(format!("{}", Outcome::Tie), "tie");
    }

    #[test]
    fn test_debate_status_terminality() {
        assert!(DebateStatus::Completed.is_terminal());
        assert!(DebateStatus::Failed.is_terminal());
        assert!(!DebateStatus::Pending.is_terminal());
        assert!(!DebateStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_new_vote_is_unresolved() {
        let vote = UserVote::new(
            "debate_1".to_string(),
            "session_1".to_string(),
            None,
            Outcome::Pro,
            50,
            dec!(1.43),
        );
        assert!(vote.is_wager());
        assert!(!vote.is_resolved());
        assert_eq!(vote.payout_amount, 0);
    }

    #[test]
    fn test_vote_only_row_is_not_wager() {
        let vote = UserVote::new(
            "debate_1".to_string(),
            "session_1".to_string(),
            None,
            Outcome::Tie,
            0,
            dec!(3.00),
        );
        assert!(!vote.is_wager());
    }

    #[test]
    fn test_fresh_profile_defaults() {
        let profile = UserProfile::new("session_9".to_string(), 1000);
        assert_eq!(profile.debate_points, 1000);
        assert_eq!(profile.total_bets_placed, 0);
        assert!(!profile.is_superforecaster);
        assert_eq!(profile.accuracy_pct(), 0.0);
        assert_eq!(profile.roi_pct(), 0.0);
    }

    #[test]
    fn test_superforecaster_threshold_integer_exact() {
        let mut profile = UserProfile::new("s".to_string(), 1000);
        profile.total_bets_placed = 10;
        profile.correct_predictions = 8;
        assert!(profile.qualifies_superforecaster(10, 80));

        profile.correct_predictions = 7;
        assert!(!profile.qualifies_superforecaster(10, 80));

        profile.total_bets_placed = 9;
        profile.correct_predictions = 9;
        assert!(!profile.qualifies_superforecaster(10, 80));
    }

    #[test]
    fn test_match_result_tallies() {
        let mut model = ModelRecord::new(
            "m1".to_string(),
            "GPT-Test".to_string(),
            "openai".to_string(),
            1500.0,
            350.0,
            0.06,
        );
        model.record_result(MatchResult::Win);
        model.record_result(MatchResult::Tie);
        model.record_result(MatchResult::Loss);
        assert_eq!(model.total_debates, 3);
        assert_eq!(model.wins + model.losses + model.ties, model.total_debates);
    }

    #[test]
    fn test_match_result_scores_and_inverse() {
        assert_eq!(MatchResult::Win.score(), 1.0);
        assert_eq!(MatchResult::Tie.score(), 0.5);
        assert_eq!(MatchResult::Loss.score(), 0.0);
        assert_eq!(MatchResult::Win.inverse(), MatchResult::Loss);
        assert_eq!(MatchResult::Tie.inverse(), MatchResult::Tie);
        assert_eq!(MatchResult::for_pro_side(Outcome::Con), MatchResult::Loss);
    }
}
