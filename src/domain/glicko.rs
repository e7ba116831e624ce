//! Glicko-2 rating mathematics.
//!
//! Implements the standard Glicko-2 procedure (Glickman's published
//! recurrence) for the two-player case: expected score, volatility
//! iteration, deviation shrinkage on play and inflation on idleness.
//! Both of the arena's rating tracks (crowd and AI-quality) run this
//! same update independently.
//!
//! The public API stays on the familiar 1500-centered scale; conversion
//! to the internal Glicko-2 scale happens inside the update.

use serde::{Deserialize, Serialize};

use super::debate::MatchResult;

/// Conversion factor between the public scale and the Glicko-2 scale.
const SCALE: f64 = 173.7178;

/// Convergence tolerance for the volatility iteration.
const CONVERGENCE_EPS: f64 = 1e-6;

/// One rating triple on the public 1500-centered scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlickoRating {
    /// Estimated skill.
    pub rating: f64,
    /// Uncertainty of the estimate; shrinks with play, grows with idleness.
    pub deviation: f64,
    /// How erratically the rating has been swinging.
    pub volatility: f64,
}

/// Rating system parameters.
///
/// `tau` constrains how fast volatility can change; smaller values
/// damp rating swings from single surprising results.
#[derive(Debug, Clone)]
pub struct GlickoSystem {
    tau: f64,
    initial_rating: f64,
    initial_deviation: f64,
    min_deviation: f64,
    default_volatility: f64,
}

impl GlickoSystem {
    pub fn new(
        tau: f64,
        initial_rating: f64,
        initial_deviation: f64,
        min_deviation: f64,
        default_volatility: f64,
    ) -> Self {
        Self {
            tau,
            initial_rating,
            initial_deviation,
            min_deviation,
            default_volatility,
        }
    }

    /// The rating every new model starts at.
    pub fn initial(&self) -> GlickoRating {
        GlickoRating {
            rating: self.initial_rating,
            deviation: self.initial_deviation,
            volatility: self.default_volatility,
        }
    }

    /// Default system volatility, used for tracks that persist none.
    pub fn default_volatility(&self) -> f64 {
        self.default_volatility
    }

    /// Update both sides of one contest symmetrically.
    ///
    /// `result_a` is the outcome from `a`'s perspective; `b` receives the
    /// inverse. A tie scores 0.5 for both sides.
    pub fn rate_pair(
        &self,
        a: GlickoRating,
        b: GlickoRating,
        result_a: MatchResult,
    ) -> (GlickoRating, GlickoRating) {
        let new_a = self.rate_single(a, b, result_a.score());
        let new_b = self.rate_single(b, a, result_a.inverse().score());
        (new_a, new_b)
    }

    /// Inflate a rating's deviation after `idle_periods` rating periods
    /// without play. Capped at the initial deviation: an idle model's
    /// rating can become as uncertain as a new one's, never more.
    pub fn decay_idle(&self, r: GlickoRating, idle_periods: f64) -> GlickoRating {
        if idle_periods <= 0.0 {
            return r;
        }
        let phi = r.deviation / SCALE;
        let sigma = r.volatility;
        let phi_inflated = (phi * phi + sigma * sigma * idle_periods).sqrt();
        GlickoRating {
            rating: r.rating,
            deviation: (phi_inflated * SCALE).min(self.initial_deviation),
            volatility: r.volatility,
        }
    }

    /// One-sided Glicko-2 update against a single opponent.
    fn rate_single(&self, player: GlickoRating, opponent: GlickoRating, score: f64) -> GlickoRating {
        let mu = (player.rating - self.initial_rating) / SCALE;
        let phi = player.deviation / SCALE;
        let sigma = player.volatility;

        let mu_j = (opponent.rating - self.initial_rating) / SCALE;
        let phi_j = opponent.deviation / SCALE;

        let g_j = g(phi_j);
        let e_j = expected(mu, mu_j, phi_j);

        // Estimated variance of the rating from this game alone.
        let v = 1.0 / (g_j * g_j * e_j * (1.0 - e_j));
        // Estimated improvement implied by the score.
        let delta = v * g_j * (score - e_j);

        let sigma_new = self.update_volatility(phi, v, delta, sigma);

        let phi_star = (phi * phi + sigma_new * sigma_new).sqrt();
        let phi_new = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
        let mu_new = mu + phi_new * phi_new * g_j * (score - e_j);

        GlickoRating {
            rating: self.initial_rating + SCALE * mu_new,
            deviation: (phi_new * SCALE).clamp(self.min_deviation, self.initial_deviation),
            volatility: sigma_new,
        }
    }

    /// Volatility iteration (regula falsi with the Illinois modification).
    fn update_volatility(&self, phi: f64, v: f64, delta: f64, sigma: f64) -> f64 {
        let a = (sigma * sigma).ln();
        let phi2 = phi * phi;
        let delta2 = delta * delta;
        let tau2 = self.tau * self.tau;

        let f = |x: f64| -> f64 {
            let ex = x.exp();
            let denom = phi2 + v + ex;
            ex * (delta2 - phi2 - v - ex) / (2.0 * denom * denom) - (x - a) / tau2
        };

        let mut lower = a;
        let mut upper = if delta2 > phi2 + v {
            (delta2 - phi2 - v).ln()
        } else {
            let mut k = 1.0;
            while f(a - k * self.tau) < 0.0 {
                k += 1.0;
            }
            a - k * self.tau
        };

        let mut f_lower = f(lower);
        let mut f_upper = f(upper);

        while (upper - lower).abs() > CONVERGENCE_EPS {
            let mid = lower + (lower - upper) * f_lower / (f_upper - f_lower);
            let f_mid = f(mid);
            if f_mid * f_upper <= 0.0 {
                lower = upper;
                f_lower = f_upper;
            } else {
                f_lower /= 2.0;
            }
            upper = mid;
            f_upper = f_mid;
        }

        (lower / 2.0).exp()
    }
}

impl Default for GlickoSystem {
    /// Glickman's recommended parameters on the 1500 scale.
    fn default() -> Self {
        Self::new(0.5, 1500.0, 350.0, 30.0, 0.06)
    }
}

fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (std::f64::consts::PI * std::f64::consts::PI)).sqrt()
}

fn expected(mu: f64, mu_j: f64, phi_j: f64) -> f64 {
    1.0 / (1.0 + (-g(phi_j) * (mu - mu_j)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> GlickoSystem {
        GlickoSystem::default()
    }

    #[test]
    fn test_winner_gains_loser_drops() {
        let sys = system();
        let (a, b) = sys.rate_pair(sys.initial(), sys.initial(), MatchResult::Win);
        assert!(a.rating > 1500.0, "winner should gain, got {}", a.rating);
        assert!(b.rating < 1500.0, "loser should drop, got {}", b.rating);
    }

    #[test]
    fn test_equal_tie_leaves_ratings_unchanged() {
        let sys = system();
        let (a, b) = sys.rate_pair(sys.initial(), sys.initial(), MatchResult::Tie);
        assert!((a.rating - 1500.0).abs() < 1e-6);
        assert!((b.rating - 1500.0).abs() < 1e-6);
        // Deviation still shrinks: a tie is information too.
        assert!(a.deviation < 350.0);
        assert!(b.deviation < 350.0);
    }

    #[test]
    fn test_symmetry_of_pair_update() {
        let sys = system();
        let (a1, b1) = sys.rate_pair(sys.initial(), sys.initial(), MatchResult::Win);
        let (b2, a2) = sys.rate_pair(sys.initial(), sys.initial(), MatchResult::Loss);
        assert!((a1.rating - a2.rating).abs() < 1e-9);
        assert!((b1.rating - b2.rating).abs() < 1e-9);
    }

    #[test]
    fn test_deviation_shrinks_on_play() {
        let sys = system();
        let mut a = sys.initial();
        let mut b = sys.initial();
        for _ in 0..5 {
            let (na, nb) = sys.rate_pair(a, b, MatchResult::Win);
            a = na;
            b = nb;
        }
        assert!(a.deviation < 350.0);
        assert!(a.deviation >= 30.0, "deviation floor must hold");
    }

    #[test]
    fn test_upset_moves_rating_more_than_expected_win() {
        let sys = system();
        let strong = GlickoRating {
            rating: 1800.0,
            deviation: 100.0,
            volatility: 0.06,
        };
        let weak = GlickoRating {
            rating: 1400.0,
            deviation: 100.0,
            volatility: 0.06,
        };
        let (strong_after_win, _) = sys.rate_pair(strong, weak, MatchResult::Win);
        let (_, weak_after_upset) = sys.rate_pair(strong, weak, MatchResult::Loss);
        let expected_gain = strong_after_win.rating - strong.rating;
        let upset_gain = weak_after_upset.rating - weak.rating;
        assert!(
            upset_gain > expected_gain,
            "upset gain {upset_gain} should exceed expected-win gain {expected_gain}"
        );
    }

    #[test]
    fn test_idle_decay_inflates_deviation() {
        let sys = system();
        let settled = GlickoRating {
            rating: 1620.0,
            deviation: 80.0,
            volatility: 0.06,
        };
        let after_one = sys.decay_idle(settled, 1.0);
        let after_ten = sys.decay_idle(settled, 10.0);
        assert!(after_one.deviation > 80.0);
        assert!(after_ten.deviation > after_one.deviation);
        assert_eq!(after_one.rating, settled.rating);
    }

    #[test]
    fn test_idle_decay_caps_at_initial_deviation() {
        let sys = system();
        let settled = GlickoRating {
            rating: 1620.0,
            deviation: 340.0,
            volatility: 0.06,
        };
        let after_long_idle = sys.decay_idle(settled, 100_000.0);
        assert_eq!(after_long_idle.deviation, 350.0);
    }

    #[test]
    fn test_zero_idle_is_a_noop() {
        let sys = system();
        let r = sys.initial();
        assert_eq!(sys.decay_idle(r, 0.0), r);
    }

    #[test]
    fn test_volatility_stays_near_tau_bounds() {
        let sys = system();
        let (a, _) = sys.rate_pair(sys.initial(), sys.initial(), MatchResult::Win);
        // One unsurprising game barely moves volatility from 0.06.
        assert!((a.volatility - 0.06).abs() < 0.01, "got {}", a.volatility);
    }
}
