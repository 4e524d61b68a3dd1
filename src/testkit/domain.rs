//! Builders for domain primitives used across tests.
//!
//! Markets built here name their tokens `{id}-yes` and `{id}-no`, so tests
//! can address quotes without holding on to the market values.

use rust_decimal::Decimal;

use crate::domain::{ConditionId, Market, OutcomeRange, Price, QuoteEvent, Size, TokenId};

/// YES token of the market with condition id `id`.
pub fn yes(id: &str) -> TokenId {
    TokenId::from(format!("{id}-yes"))
}

/// NO token of the market with condition id `id`.
pub fn no(id: &str) -> TokenId {
    TokenId::from(format!("{id}-no"))
}

/// A plain binary market.
pub fn binary(id: &str) -> Market {
    Market::binary(ConditionId::from(id), format!("{id}?"), yes(id), no(id))
}

/// A range parent `[x, +inf)`.
pub fn parent_above(id: &str, x: Decimal) -> Market {
    Market::range_parent(
        ConditionId::from(id),
        format!("Above {x}?"),
        yes(id),
        no(id),
        OutcomeRange::at_or_above(x),
    )
}

/// A range parent `[lower, upper)`.
pub fn parent_between(id: &str, lower: Decimal, upper: Decimal) -> Market {
    Market::range_parent(
        ConditionId::from(id),
        format!("Between {lower} and {upper}?"),
        yes(id),
        no(id),
        bounded(lower, upper),
    )
}

/// A range child `[-inf, x)` under `parent`.
pub fn child_below(id: &str, parent: &str, x: Decimal) -> Market {
    Market::range_child(
        ConditionId::from(id),
        format!("Below {x}?"),
        yes(id),
        no(id),
        OutcomeRange::below(x),
        ConditionId::from(parent),
    )
}

/// A range child `[x, +inf)` under `parent`.
pub fn child_above(id: &str, parent: &str, x: Decimal) -> Market {
    Market::range_child(
        ConditionId::from(id),
        format!("Above {x}?"),
        yes(id),
        no(id),
        OutcomeRange::at_or_above(x),
        ConditionId::from(parent),
    )
}

/// A range child `[lower, upper)` under `parent`.
pub fn bounded_child(id: &str, parent: &str, lower: Decimal, upper: Decimal) -> Market {
    Market::range_child(
        ConditionId::from(id),
        format!("Between {lower} and {upper}?"),
        yes(id),
        no(id),
        bounded(lower, upper),
        ConditionId::from(parent),
    )
}

/// A parent `[0, n * width)` tiled by `n` children `c0..c{n-1}` of equal width.
pub fn tiled_partition(parent: &str, n: usize, width: i64) -> Vec<Market> {
    let top = width * n as i64;
    let mut markets = vec![parent_between(parent, Decimal::ZERO, Decimal::from(top))];
    for i in 0..n {
        let lower = Decimal::from(width * i as i64);
        let upper = Decimal::from(width * (i as i64 + 1));
        markets.push(bounded_child(&format!("{parent}-c{i}"), parent, lower, upper));
    }
    markets
}

/// Condition ids of the children built by [`tiled_partition`].
pub fn tiled_children(parent: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{parent}-c{i}")).collect()
}

/// A top-of-book quote event.
pub fn quote(token: &TokenId, bid: Price, bid_size: Size, ask: Price, ask_size: Size, seq: u64) -> QuoteEvent {
    QuoteEvent::top(token.clone(), bid, bid_size, ask, ask_size, seq)
}

fn bounded(lower: Decimal, upper: Decimal) -> OutcomeRange {
    OutcomeRange::new(Some(lower), Some(upper)).unwrap_or_else(|| OutcomeRange::at_or_above(lower))
}
