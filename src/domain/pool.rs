//! Bet pool aggregation.
//!
//! A `BetPool` is derived state: the sum of `wager_amount` across a
//! debate's votes, partitioned by backed outcome. It is recomputed on
//! demand from current rows, never cached as a running counter, so odds
//! always reflect the latest committed bets.

use serde::{Deserialize, Serialize};

use super::debate::{Outcome, UserVote};

/// Per-outcome wager totals for one debate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetPool {
    /// Points wagered on the pro side.
    pub pro_total: i64,
    /// Points wagered on the con side.
    pub con_total: i64,
    /// Points wagered on a tie.
    pub tie_total: i64,
}

impl BetPool {
    /// Aggregate a debate's vote rows into a pool.
    ///
    /// Vote-only rows (`wager_amount == 0`) contribute nothing.
    pub fn from_votes<'a, I>(votes: I) -> Self
    where
        I: IntoIterator<Item = &'a UserVote>,
    {
        let mut pool = Self::default();
        for vote in votes {
            pool.add(vote.vote, vote.wager_amount);
        }
        pool
    }

    /// Add a wager to the pool.
    pub fn add(&mut self, outcome: Outcome, wager: i64) {
        match outcome {
            Outcome::Pro => self.pro_total += wager,
            Outcome::Con => self.con_total += wager,
            Outcome::Tie => self.tie_total += wager,
        }
    }

    /// Total points across all three sides.
    pub fn total(&self) -> i64 {
        self.pro_total + self.con_total + self.tie_total
    }

    /// The wager total backing one outcome.
    pub fn side(&self, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::Pro => self.pro_total,
            Outcome::Con => self.con_total,
            Outcome::Tie => self.tie_total,
        }
    }

    /// True when nobody has wagered yet.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wager(outcome: Outcome, amount: i64) -> UserVote {
        UserVote::new(
            "debate_1".to_string(),
            format!("session_{amount}"),
            None,
            outcome,
            amount,
            dec!(2.00),
        )
    }

    #[test]
    fn test_empty_pool() {
        let pool = BetPool::from_votes(std::iter::empty());
        assert!(pool.is_empty());
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn test_pool_partitions_by_outcome() {
        let votes = vec![
            wager(Outcome::Pro, 100),
            wager(Outcome::Pro, 50),
            wager(Outcome::Con, 30),
            wager(Outcome::Tie, 20),
        ];
        let pool = BetPool::from_votes(&votes);
        assert_eq!(pool.pro_total, 150);
        assert_eq!(pool.con_total, 30);
        assert_eq!(pool.tie_total, 20);
        assert_eq!(pool.total(), 200);
    }

    #[test]
    fn test_pool_total_is_sum_of_wagers() {
        let votes = vec![
            wager(Outcome::Pro, 10),
            wager(Outcome::Con, 500),
            wager(Outcome::Tie, 250),
        ];
        let pool = BetPool::from_votes(&votes);
        let expected: i64 = votes.iter().map(|v| v.wager_amount).sum();
        assert_eq!(pool.total(), expected);
    }

    #[test]
    fn test_vote_only_rows_ignored() {
        let votes = vec![wager(Outcome::Pro, 0), wager(Outcome::Con, 40)];
        let pool = BetPool::from_votes(&votes);
        assert_eq!(pool.pro_total, 0);
        assert_eq!(pool.con_total, 40);
    }

    #[test]
    fn test_side_accessor() {
        let mut pool = BetPool::default();
        pool.add(Outcome::Tie, 75);
        assert_eq!(pool.side(Outcome::Tie), 75);
        assert_eq!(pool.side(Outcome::Pro), 0);
    }
}
