//! Complement pair arbitrage.
//!
//! For a child `< X` and a parent `>= X`, exactly one of the two resolves
//! YES, so YES(child) and NO(parent) are the same claim. The parent NO side
//! is priced from the parent YES quote as `1 - price`; both directions use
//! top-of-book only.

use super::{mirrored, top, GroupSnapshot, MarketGroup, Opportunity, Sizing, StrategyTag, Trade};
use crate::domain::{LegRole, Member};

/// Evaluate `BUY_CHILD_YES_SELL_PARENT_NO` and `BUY_PARENT_NO_SELL_CHILD_YES`.
#[must_use]
pub fn evaluate(
    group: &MarketGroup,
    child: &Member,
    parent: &Member,
    snapshot: &GroupSnapshot,
    sizing: &Sizing,
) -> Vec<Opportunity> {
    let (Some(child_quote), Some(parent_quote)) = (snapshot.get(child.yes), snapshot.get(parent.yes))
    else {
        return Vec::new();
    };

    // Selling parent NO at `1 - askParentYes` is buying parent YES at its ask.
    let child_ask = top(child_quote.best_ask());
    let parent_no_bid = mirrored(parent_quote.best_ask());
    let buy_child = Trade::new(sizing)
        .buy(&child.yes_token, child.role, &child_ask)
        .sell(&parent.no_token, LegRole::Parent, &parent_no_bid)
        .fill(StrategyTag::BuyChildYesSellParentNo, group);

    let parent_no_ask = mirrored(parent_quote.best_bid());
    let child_bid = top(child_quote.best_bid());
    let buy_parent = Trade::new(sizing)
        .buy(&parent.no_token, LegRole::Parent, &parent_no_ask)
        .sell(&child.yes_token, child.role, &child_bid)
        .fill(StrategyTag::BuyParentNoSellChildYes, group);

    buy_child.into_iter().chain(buy_parent).collect()
}
