//! Rating diagnostics derived from the two tracks.
//!
//! Pure functions of a model's crowd and AI-quality ratings, consumed by
//! the leaderboard. A large gap between the two tracks means the human
//! audience and the AI judge disagree about a model; a one-sided gap in
//! the crowd's favour is the platform's "rhetorically convincing but
//! logically weak" signal.

/// Absolute gap between the crowd and AI-quality ratings. Symmetric.
pub fn controversy_index(crowd_rating: f64, ai_rating: f64) -> f64 {
    (crowd_rating - ai_rating).abs()
}

/// Whether a gap is large enough to flag the model as controversial.
pub fn is_controversial(crowd_rating: f64, ai_rating: f64, threshold: f64) -> bool {
    controversy_index(crowd_rating, ai_rating) > threshold
}

/// One-sided measure of persuasiveness outrunning judged quality.
///
/// Each rating is normalized from the 1500-centered scale to 0–100 via
/// `(rating - 1500) / 10 + 50`; the index is the crowd surplus, floored
/// at zero. Zero whenever the AI-quality rating meets or exceeds the
/// crowd rating.
pub fn charismatic_liar_index(crowd_rating: f64, ai_rating: f64) -> f64 {
    (normalize(crowd_rating) - normalize(ai_rating)).max(0.0)
}

fn normalize(rating: f64) -> f64 {
    (rating - 1500.0) / 10.0 + 50.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controversy_is_symmetric() {
        assert_eq!(controversy_index(1700.0, 1500.0), controversy_index(1500.0, 1700.0));
        assert_eq!(controversy_index(1234.0, 1432.0), controversy_index(1432.0, 1234.0));
    }

    #[test]
    fn test_controversy_flagging_threshold() {
        assert_eq!(controversy_index(1700.0, 1500.0), 200.0);
        assert!(is_controversial(1700.0, 1500.0, 150.0));

        assert_eq!(controversy_index(1600.0, 1500.0), 100.0);
        assert!(!is_controversial(1600.0, 1500.0, 150.0));
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly at the threshold is not flagged.
        assert!(!is_controversial(1650.0, 1500.0, 150.0));
    }

    #[test]
    fn test_liar_index_zero_when_judge_agrees_or_rates_higher() {
        assert_eq!(charismatic_liar_index(1500.0, 1500.0), 0.0);
        assert_eq!(charismatic_liar_index(1500.0, 1700.0), 0.0);
        assert_eq!(charismatic_liar_index(1400.0, 1400.0), 0.0);
    }

    #[test]
    fn test_liar_index_positive_for_crowd_surplus() {
        // 1700 crowd → 70 normalized; 1500 AI → 50 normalized.
        assert_eq!(charismatic_liar_index(1700.0, 1500.0), 20.0);
    }

    #[test]
    fn test_liar_index_increasing_in_crowd_rating() {
        let ai = 1500.0;
        let low = charismatic_liar_index(1550.0, ai);
        let mid = charismatic_liar_index(1650.0, ai);
        let high = charismatic_liar_index(1750.0, ai);
        assert!(low < mid && mid < high);
    }
}
