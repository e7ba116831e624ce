//! Market + Rating Benchmarks — Hot-Path Performance Validation
//!
//! Benchmarks the domain functions that run on every bet quote and
//! every debate resolution.
//!
//! Run with: cargo bench --bench market_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

use debate_arena::domain::debate::MatchResult;
use debate_arena::domain::diagnostics;
use debate_arena::domain::glicko::{GlickoRating, GlickoSystem};
use debate_arena::domain::odds::OddsCalculator;
use debate_arena::domain::pool::BetPool;

/// Benchmark a full odds quote over a populated pool.
fn bench_odds_quote(c: &mut Criterion) {
    let calc = OddsCalculator::default();
    let pool = BetPool {
        pro_total: 4200,
        con_total: 1337,
        tie_total: 250,
    };

    c.bench_function("odds_quote_three_sided", |b| {
        b.iter(|| {
            let _odds = calc.quote(black_box(&pool));
        });
    });
}

/// Benchmark payout computation at snapshotted odds.
fn bench_payout(c: &mut Criterion) {
    c.bench_function("payout_floor", |b| {
        b.iter(|| {
            let _payout = OddsCalculator::payout(black_box(500), black_box(dec!(2.85)));
        });
    });
}

/// Benchmark a symmetric Glicko-2 pair update (includes the volatility
/// iteration, the most expensive step of a resolution).
fn bench_glicko_pair_update(c: &mut Criterion) {
    let sys = GlickoSystem::default();
    let a = GlickoRating {
        rating: 1620.0,
        deviation: 120.0,
        volatility: 0.06,
    };
    let b_side = GlickoRating {
        rating: 1480.0,
        deviation: 90.0,
        volatility: 0.06,
    };

    c.bench_function("glicko_pair_update", |b| {
        b.iter(|| {
            let _ = sys.rate_pair(black_box(a), black_box(b_side), MatchResult::Win);
        });
    });
}

/// Benchmark the leaderboard diagnostics.
fn bench_diagnostics(c: &mut Criterion) {
    c.bench_function("controversy_and_liar_index", |b| {
        b.iter(|| {
            let _c = diagnostics::controversy_index(black_box(1700.0), black_box(1500.0));
            let _l = diagnostics::charismatic_liar_index(black_box(1700.0), black_box(1500.0));
        });
    });
}

criterion_group!(
    benches,
    bench_odds_quote,
    bench_payout,
    bench_glicko_pair_update,
    bench_diagnostics,
);
criterion_main!(benches);
