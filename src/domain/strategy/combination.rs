//! Combination arbitrage over a parent tiled by more than two children.
//!
//! Runs the bundle/unbundle checks and the complete-cover cycle. Parent NO
//! plus every child YES covers the whole outcome space with exactly one
//! winner, so the set pays 1.00: buy it when the asks sum below 1.00, or
//! sell it against split collateral when the bids sum above 1.00.

use super::partition::bundles;
use super::{GroupSnapshot, MarketGroup, Opportunity, Sizing, StrategyTag, Trade};
use crate::domain::{LegRole, Member, Quote};

/// Evaluate `COMBO_BUNDLE`, `COMBO_UNBUNDLE`, `BUY_COVER` and `SELL_COVER`.
#[must_use]
pub fn evaluate(
    group: &MarketGroup,
    parent: &Member,
    children: &[Member],
    snapshot: &GroupSnapshot,
    sizing: &Sizing,
) -> Vec<Opportunity> {
    let mut opportunities = bundles(
        group,
        parent,
        children,
        snapshot,
        sizing,
        (StrategyTag::ComboBundle, StrategyTag::ComboUnbundle),
    );
    opportunities.extend(covers(group, parent, children, snapshot, sizing));
    opportunities
}

fn covers(
    group: &MarketGroup,
    parent: &Member,
    children: &[Member],
    snapshot: &GroupSnapshot,
    sizing: &Sizing,
) -> Vec<Opportunity> {
    let Some(parent_no) = snapshot.get(parent.no) else {
        return Vec::new();
    };
    let Some(child_quotes) = children
        .iter()
        .map(|c| snapshot.get(c.yes))
        .collect::<Option<Vec<&Quote>>>()
    else {
        return Vec::new();
    };

    let mut buy_cover = Trade::new(sizing)
        .buy(&parent.no_token, LegRole::Parent, parent_no.asks())
        .payout();
    let mut sell_cover = Trade::new(sizing)
        .sell(&parent.no_token, LegRole::Parent, parent_no.bids())
        .collateral();
    for (child, quote) in children.iter().zip(&child_quotes) {
        buy_cover = buy_cover.buy(&child.yes_token, child.role, quote.asks());
        sell_cover = sell_cover.sell(&child.yes_token, child.role, quote.bids());
    }

    buy_cover
        .fill(StrategyTag::BuyCover, group)
        .into_iter()
        .chain(sell_cover.fill(StrategyTag::SellCover, group))
        .collect()
}
