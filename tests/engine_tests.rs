mod support;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rangearb::config::EngineConfig;
use rangearb::domain::{Market, MarketIndex, Side, StrategyTag};
use rangearb::engine::{Engine, LegPriority};
use rangearb::error::EngineError;
use rangearb::testkit::config::{eager, engine as engine_config};
use rangearb::testkit::domain::{
    binary, child_above, child_below, no, parent_above, quote, tiled_children, tiled_partition, yes,
};
use rangearb::testkit::CollectingSink;
use rust_decimal_macros::dec;
use support::assertions::{assert_orders, strategies};

fn engine(markets: Vec<Market>, config: &EngineConfig) -> (Engine, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let index = MarketIndex::build(markets).expect("build index");
    (Engine::new(index, config, sink.clone()), sink)
}

fn complement() -> Vec<Market> {
    vec![parent_above("p", dec!(50)), child_below("c", "p", dec!(50))]
}

#[test]
fn complement_plan_locks_exact_profit() {
    let (engine, sink) = engine(complement(), &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&yes("p"), dec!(0.54), 100, dec!(0.55), 120, 1), now)
        .unwrap();
    engine
        .on_quote(quote(&yes("c"), dec!(0.38), 100, dec!(0.40), 70, 1), now)
        .unwrap();

    let plans = sink.plans();
    assert_eq!(strategies(&plans), vec![StrategyTag::BuyChildYesSellParentNo]);
    let plan = &plans[0];
    assert_eq!(plan.expected_profit, dec!(3.50));
    assert_eq!(plan.expected_profit_bps, 1250);
    assert_orders(
        plan,
        &[
            ("p-no", Side::Sell, dec!(0.45), 70),
            ("c-yes", Side::Buy, dec!(0.40), 70),
        ],
    );
}

#[test]
fn complement_at_parity_emits_nothing() {
    let (engine, sink) = engine(complement(), &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&yes("p"), dec!(0.54), 100, dec!(0.55), 100, 1), now)
        .unwrap();
    let outcome = engine
        .on_quote(quote(&yes("c"), dec!(0.44), 100, dec!(0.45), 100, 1), now)
        .unwrap();

    assert_eq!(outcome.opportunities, 0);
    assert!(sink.is_empty());
}

#[test]
fn same_direction_profit_is_bid_minus_ask() {
    let markets = vec![parent_above("p", dec!(50)), child_above("c", "p", dec!(50))];
    let (engine, sink) = engine(markets, &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&yes("p"), dec!(0.45), 40, dec!(0.47), 40, 1), now)
        .unwrap();
    engine
        .on_quote(quote(&yes("c"), dec!(0.38), 60, dec!(0.40), 60, 1), now)
        .unwrap();

    let plans = sink.plans();
    assert_eq!(strategies(&plans), vec![StrategyTag::BuyChildYesSellParentYes]);
    assert_eq!(plans[0].expected_profit, dec!(0.05) * dec!(40));
}

#[test]
fn threshold_filters_thin_opportunities() {
    // 0.95 cost, 0.05 profit per unit: 526 bps
    let run = |min_profit_bps| {
        let (engine, sink) = engine(vec![binary("m")], &engine_config(min_profit_bps, 1_000));
        let now = Instant::now();
        engine
            .on_quote(quote(&yes("m"), dec!(0.40), 10, dec!(0.45), 10, 1), now)
            .unwrap();
        engine
            .on_quote(quote(&no("m"), dec!(0.40), 10, dec!(0.50), 10, 1), now)
            .unwrap();
        (sink.len(), engine.stats())
    };

    let (emitted, _) = run(526);
    assert_eq!(emitted, 1);

    let (emitted, stats) = run(527);
    assert_eq!(emitted, 0);
    assert_eq!(stats.below_threshold, 1);
}

#[test]
fn cooldown_suppresses_repeat_plans_until_window_ends() {
    let config = engine_config(0, 500);
    let (engine, sink) = engine(vec![binary("m")], &config);
    let start = Instant::now();

    engine
        .on_quote(quote(&yes("m"), dec!(0.40), 10, dec!(0.45), 10, 1), start)
        .unwrap();
    engine
        .on_quote(quote(&no("m"), dec!(0.40), 10, dec!(0.50), 10, 1), start)
        .unwrap();
    assert_eq!(sink.len(), 1);

    let almost = start + Duration::from_millis(499);
    engine
        .on_quote(quote(&no("m"), dec!(0.40), 10, dec!(0.50), 10, 2), almost)
        .unwrap();
    assert_eq!(sink.len(), 1);
    assert_eq!(engine.stats().throttled, 1);

    let expired = start + Duration::from_millis(500);
    engine
        .on_quote(quote(&no("m"), dec!(0.40), 10, dec!(0.50), 10, 3), expired)
        .unwrap();
    assert_eq!(sink.len(), 2);
}

#[test]
fn stale_update_is_dropped_without_evaluation() {
    let (engine, sink) = engine(vec![binary("m")], &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&no("m"), dec!(0.40), 10, dec!(0.50), 10, 1), now)
        .unwrap();
    engine
        .on_quote(quote(&yes("m"), dec!(0.30), 10, dec!(0.60), 10, 5), now)
        .unwrap();

    let err = engine
        .on_quote(quote(&yes("m"), dec!(0.40), 10, dec!(0.45), 10, 3), now)
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::StaleUpdate {
            token_id: yes("m"),
            stored: 5,
            received: 3,
        }
    );
    assert_eq!(engine.quote(&yes("m")).unwrap().sequence(), 5);
    assert!(sink.is_empty());
    assert_eq!(engine.stats().stale_updates, 1);
}

#[test]
fn unknown_token_is_rejected() {
    let (engine, _) = engine(vec![binary("m")], &eager());
    let err = engine
        .on_quote(quote(&yes("ghost"), dec!(0.40), 10, dec!(0.45), 10, 1), Instant::now())
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownMarket { .. }));
    assert_eq!(engine.stats().unknown_tokens, 1);
}

#[test]
fn cover_over_nineteen_children_is_truncated_to_fifteen() {
    let (engine, sink) = engine(tiled_partition("p", 19, 10), &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&no("p"), dec!(0.45), 100, dec!(0.50), 100, 1), now)
        .unwrap();
    for child in tiled_children("p", 19) {
        engine
            .on_quote(quote(&yes(&child), dec!(0.005), 100, dec!(0.01), 100, 1), now)
            .unwrap();
    }

    let plans = sink.plans();
    assert_eq!(strategies(&plans), vec![StrategyTag::BuyCover]);
    let plan = &plans[0];
    assert_eq!(plan.len(), 15);
    assert!(plan.truncated);
    assert_eq!(plan.dropped_legs, 5);
    assert_eq!(plan.orders[0].token_id, no("p"));
    assert_eq!(plan.orders[1].token_id, yes("p-c0"));
    assert_eq!(plan.orders[14].token_id, yes("p-c13"));
    assert!(matches!(plan.truncation(), Some(EngineError::TruncatedPlan { kept: 15, dropped: 5, .. })));
    assert_eq!(engine.stats().plans_truncated, 1);
}

#[test]
fn cover_over_eleven_children_fits_one_batch() {
    let (engine, sink) = engine(tiled_partition("p", 11, 10), &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&no("p"), dec!(0.45), 100, dec!(0.50), 100, 1), now)
        .unwrap();
    for child in tiled_children("p", 11) {
        engine
            .on_quote(quote(&yes(&child), dec!(0.005), 100, dec!(0.01), 100, 1), now)
            .unwrap();
    }

    let plans = sink.plans();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].len(), 12);
    assert!(!plans[0].truncated);
}

#[test]
fn evaluator_priority_keeps_evaluator_leg_order() {
    let config = EngineConfig {
        leg_priority: LegPriority::Evaluator,
        ..eager()
    };
    let (engine, sink) = engine(complement(), &config);
    let now = Instant::now();

    engine
        .on_quote(quote(&yes("p"), dec!(0.54), 100, dec!(0.55), 120, 1), now)
        .unwrap();
    engine
        .on_quote(quote(&yes("c"), dec!(0.38), 100, dec!(0.40), 70, 1), now)
        .unwrap();

    let plans = sink.plans();
    assert_eq!(plans[0].orders[0].token_id, yes("c"));
    assert_eq!(plans[0].orders[1].token_id, no("p"));
}

#[test]
fn rebuild_keeps_quotes_for_surviving_tokens() {
    let (engine, sink) = engine(complement(), &eager());
    let now = Instant::now();

    engine
        .on_quote(quote(&yes("p"), dec!(0.54), 100, dec!(0.55), 120, 1), now)
        .unwrap();

    let mut markets = complement();
    markets.push(binary("m"));
    let census = engine.rebuild(markets).unwrap();
    assert_eq!(census.complement, 1);
    assert_eq!(census.binary, 3);
    assert_eq!(engine.quote(&yes("p")).unwrap().sequence(), 1);

    engine
        .on_quote(quote(&yes("c"), dec!(0.38), 100, dec!(0.40), 70, 1), now)
        .unwrap();
    assert_eq!(sink.len(), 1);
}

#[test]
fn rebuild_rejects_malformed_catalog_and_keeps_old_universe() {
    let (engine, _) = engine(complement(), &eager());
    let markets = vec![child_below("c", "missing", dec!(50))];

    assert!(engine.rebuild(markets).is_err());
    assert_eq!(engine.census().complement, 1);
}

#[test]
fn concurrent_updates_for_different_tokens_all_apply() {
    let markets: Vec<Market> = (0..8).map(|i| binary(&format!("m{i}"))).collect();
    let (engine, _) = engine(markets, &engine_config(1_000_000, 1_000));
    let engine = Arc::new(engine);
    let now = Instant::now();

    thread::scope(|scope| {
        for i in 0..8 {
            let engine = Arc::clone(&engine);
            scope.spawn(move || {
                let id = format!("m{i}");
                for seq in 1..=50 {
                    engine
                        .on_quote(quote(&yes(&id), dec!(0.40), 10, dec!(0.45), 10, seq), now)
                        .unwrap();
                    engine
                        .on_quote(quote(&no(&id), dec!(0.40), 10, dec!(0.50), 10, seq), now)
                        .unwrap();
                }
            });
        }
    });

    let stats = engine.stats();
    assert_eq!(stats.updates_applied, 8 * 50 * 2);
    assert_eq!(stats.stale_updates, 0);
    assert_eq!(stats.plans_emitted, 0);
}
