//! Parimutuel odds calculation.
//!
//! The pricing model is parimutuel: the crowd's own money sets the payout
//! ratio, so no external price feed is needed, and the house edge funds
//! the point economy without real-money risk.
//!
//! For a pool with totals `P_side`:
//!   `odds_side = max(min_odds, total * (1 - house_edge) / P_side)`
//! rounded to 2 decimal places. An empty pool returns fixed defaults and
//! an empty side gets a fixed high placeholder instead of dividing by
//! zero; both sets of constants are deliberate product choices, not
//! derived values.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::debate::Outcome;
use super::pool::BetPool;

/// Payout multipliers for the three outcomes of one debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsTable {
    pub pro: Decimal,
    pub con: Decimal,
    pub tie: Decimal,
}

impl OddsTable {
    /// The multiplier quoted for one outcome.
    pub fn for_outcome(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::Pro => self.pro,
            Outcome::Con => self.con,
            Outcome::Tie => self.tie,
        }
    }
}

/// Parimutuel odds calculator.
///
/// All parameters come from `[market]` config; the defaults match the
/// platform's launch economy (5% house edge, 1.1 floor, 2.0/2.0/3.0
/// no-information defaults, 10.0/15.0 empty-side placeholders).
#[derive(Debug, Clone)]
pub struct OddsCalculator {
    /// Fraction of the pool withheld before computing odds.
    house_edge: Decimal,
    /// Hard floor so a winning bettor always gets some return.
    min_odds: Decimal,
    /// Defaults quoted while the pool is empty. Tie is priced higher
    /// than pro/con on purpose.
    default_pro_con: Decimal,
    default_tie: Decimal,
    /// Placeholders for a side nobody has backed yet.
    empty_side_pro_con: Decimal,
    empty_side_tie: Decimal,
}

impl OddsCalculator {
    /// Create a calculator with explicit parameters.
    ///
    /// # Panics
    /// Panics if `house_edge` is not in `[0, 1)` or `min_odds < 1`.
    pub fn new(house_edge: Decimal, min_odds: Decimal) -> Self {
        assert!(
            house_edge >= Decimal::ZERO && house_edge < Decimal::ONE,
            "house edge must be in [0, 1)"
        );
        assert!(min_odds >= Decimal::ONE, "min odds must be at least 1");
        Self {
            house_edge,
            min_odds,
            default_pro_con: dec!(2.0),
            default_tie: dec!(3.0),
            empty_side_pro_con: dec!(10.0),
            empty_side_tie: dec!(15.0),
        }
    }

    /// Compute the current odds table for a pool.
    pub fn quote(&self, pool: &BetPool) -> OddsTable {
        if pool.is_empty() {
            return OddsTable {
                pro: self.default_pro_con,
                con: self.default_pro_con,
                tie: self.default_tie,
            };
        }

        let effective = Decimal::from(pool.total()) * (Decimal::ONE - self.house_edge);

        OddsTable {
            pro: self.side_odds(effective, pool.pro_total, self.empty_side_pro_con),
            con: self.side_odds(effective, pool.con_total, self.empty_side_pro_con),
            tie: self.side_odds(effective, pool.tie_total, self.empty_side_tie),
        }
    }

    fn side_odds(&self, effective: Decimal, side_total: i64, placeholder: Decimal) -> Decimal {
        if side_total <= 0 {
            return placeholder;
        }
        let raw = effective / Decimal::from(side_total);
        // Half-up rounding: round_dp's banker's default would quote
        // 142.5/100 as 1.42 instead of 1.43.
        raw.max(self.min_odds)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Points paid for a winning wager at snapshotted odds: `floor(wager × odds)`.
    pub fn payout(wager: i64, odds: Decimal) -> i64 {
        (Decimal::from(wager) * odds)
            .floor()
            .to_i64()
            .unwrap_or(0)
    }
}

impl Default for OddsCalculator {
    /// Launch economy: 5% house edge, 1.1 odds floor.
    fn default() -> Self {
        Self::new(dec!(0.05), dec!(1.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(pro: i64, con: i64, tie: i64) -> BetPool {
        BetPool {
            pro_total: pro,
            con_total: con,
            tie_total: tie,
        }
    }

    #[test]
    fn test_empty_pool_returns_fixed_defaults() {
        let calc = OddsCalculator::default();
        let odds = calc.quote(&pool(0, 0, 0));
        assert_eq!(odds.pro, dec!(2.0));
        assert_eq!(odds.con, dec!(2.0));
        assert_eq!(odds.tie, dec!(3.0));
    }

    #[test]
    fn test_worked_example_from_product_doc() {
        // pool {pro: 100, con: 50, tie: 0}, total 150, edge 5%
        // effective = 142.5 → pro 1.43, con 2.85, tie placeholder 15.0
        let calc = OddsCalculator::default();
        let odds = calc.quote(&pool(100, 50, 0));
        assert_eq!(odds.pro, dec!(1.43));
        assert_eq!(odds.con, dec!(2.85));
        assert_eq!(odds.tie, dec!(15.0));
    }

    #[test]
    fn test_min_odds_floor_applies() {
        // Heavy favourite: effective / side < 1.1
        let calc = OddsCalculator::default();
        let odds = calc.quote(&pool(1000, 10, 10));
        assert_eq!(odds.pro, dec!(1.1));
        assert!(odds.con > dec!(1.1));
    }

    #[test]
    fn test_empty_side_placeholders() {
        let calc = OddsCalculator::default();
        let odds = calc.quote(&pool(0, 80, 20));
        assert_eq!(odds.pro, dec!(10.0));
        let odds = calc.quote(&pool(80, 20, 0));
        assert_eq!(odds.tie, dec!(15.0));
    }

    #[test]
    fn test_odds_rounded_to_two_places() {
        let calc = OddsCalculator::default();
        // effective = 285, pro side 70 → 4.0714... → 4.07
        let odds = calc.quote(&pool(70, 230, 0));
        assert_eq!(odds.pro, dec!(4.07));
    }

    #[test]
    fn test_payout_floors_fractional_points() {
        assert_eq!(OddsCalculator::payout(100, dec!(1.43)), 143);
        assert_eq!(OddsCalculator::payout(33, dec!(2.85)), 94); // 94.05 → 94
        assert_eq!(OddsCalculator::payout(10, dec!(1.1)), 11);
        assert_eq!(OddsCalculator::payout(0, dec!(2.0)), 0);
    }

    #[test]
    fn test_for_outcome_accessor() {
        let calc = OddsCalculator::default();
        let odds = calc.quote(&pool(100, 50, 0));
        assert_eq!(odds.for_outcome(Outcome::Pro), odds.pro);
        assert_eq!(odds.for_outcome(Outcome::Con), odds.con);
        assert_eq!(odds.for_outcome(Outcome::Tie), odds.tie);
    }

    #[test]
    #[should_panic(expected = "house edge")]
    fn test_invalid_house_edge_panics() {
        let _ = OddsCalculator::new(dec!(1.5), dec!(1.1));
    }
}
