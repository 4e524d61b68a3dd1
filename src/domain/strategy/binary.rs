//! Binary pair arbitrage.
//!
//! Exactly one of YES and NO pays 1.00, so buying both below 1.00 or selling
//! both (against split collateral) above 1.00 locks in the difference.

use super::{GroupSnapshot, MarketGroup, Opportunity, Sizing, StrategyTag, Trade};
use crate::domain::Member;

/// Evaluate `BUY_YES_BUY_NO` and `SELL_YES_SELL_NO` for one market.
#[must_use]
pub fn evaluate(
    group: &MarketGroup,
    market: &Member,
    snapshot: &GroupSnapshot,
    sizing: &Sizing,
) -> Vec<Opportunity> {
    let (Some(yes), Some(no)) = (snapshot.get(market.yes), snapshot.get(market.no)) else {
        return Vec::new();
    };

    let buy_both = Trade::new(sizing)
        .buy(&market.yes_token, market.role, yes.asks())
        .buy(&market.no_token, market.role, no.asks())
        .payout()
        .fill(StrategyTag::BuyYesBuyNo, group);

    let sell_both = Trade::new(sizing)
        .sell(&market.yes_token, market.role, yes.bids())
        .sell(&market.no_token, market.role, no.bids())
        .collateral()
        .fill(StrategyTag::SellYesSellNo, group);

    buy_both.into_iter().chain(sell_both).collect()
}
