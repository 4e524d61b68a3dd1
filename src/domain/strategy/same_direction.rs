//! Same-direction pair arbitrage.
//!
//! A child and a parent over the same range `>= X` resolve identically, so
//! their YES prices should match. When one side's ask sits below the
//! other's bid, the gap is locked in either on the YES side or on the NO
//! side (`1 - price` mirror); both earn the same profit per unit and the
//! variant with the cheaper buy price is emitted.

use super::{mirrored, top, GroupSnapshot, MarketGroup, Opportunity, Sizing, StrategyTag, Trade};
use crate::domain::money::complement;
use crate::domain::{LegRole, Member, PriceLevel, Quote};

/// Evaluate both directions of a same-direction pair.
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

    let child_cheap = Direction {
        buy_yes: Quoted::new(child, child_quote),
        sell_yes: Quoted::new(parent, parent_quote),
        yes_tag: StrategyTag::BuyChildYesSellParentYes,
        no_tag: StrategyTag::BuyParentNoSellChildNo,
    };
    let parent_cheap = Direction {
        buy_yes: Quoted::new(parent, parent_quote),
        sell_yes: Quoted::new(child, child_quote),
        yes_tag: StrategyTag::BuyParentYesSellChildYes,
        no_tag: StrategyTag::BuyChildNoSellParentNo,
    };

    [child_cheap, parent_cheap]
        .iter()
        .filter_map(|d| d.evaluate(group, sizing))
        .collect()
}

struct Quoted<'a> {
    member: &'a Member,
    quote: &'a Quote,
}

impl<'a> Quoted<'a> {
    const fn new(member: &'a Member, quote: &'a Quote) -> Self {
        Self { member, quote }
    }

    fn role(&self) -> LegRole {
        self.member.role
    }
}

/// Buy YES on one market and sell YES on the other, or the NO mirror.
struct Direction<'a> {
    buy_yes: Quoted<'a>,
    sell_yes: Quoted<'a>,
    yes_tag: StrategyTag,
    no_tag: StrategyTag,
}

impl Direction<'_> {
    fn evaluate(&self, group: &MarketGroup, sizing: &Sizing) -> Option<Opportunity> {
        let ask = self.buy_yes.quote.best_ask()?;
        let bid = self.sell_yes.quote.best_bid()?;
        if bid.price() <= ask.price() {
            return None;
        }

        // The NO mirror buys at `1 - bid` and sells at `1 - ask`.
        if ask.price() <= complement(bid.price()) {
            self.yes_side(ask, bid, group, sizing)
        } else {
            self.no_side(ask, bid, group, sizing)
        }
    }

    fn yes_side(
        &self,
        ask: &PriceLevel,
        bid: &PriceLevel,
        group: &MarketGroup,
        sizing: &Sizing,
    ) -> Option<Opportunity> {
        let asks = top(Some(ask));
        let bids = top(Some(bid));
        Trade::new(sizing)
            .buy(&self.buy_yes.member.yes_token, self.buy_yes.role(), &asks)
            .sell(&self.sell_yes.member.yes_token, self.sell_yes.role(), &bids)
            .fill(self.yes_tag, group)
    }

    fn no_side(
        &self,
        ask: &PriceLevel,
        bid: &PriceLevel,
        group: &MarketGroup,
        sizing: &Sizing,
    ) -> Option<Opportunity> {
        let no_asks = mirrored(Some(bid));
        let no_bids = mirrored(Some(ask));
        Trade::new(sizing)
            .buy(&self.sell_yes.member.no_token, self.sell_yes.role(), &no_asks)
            .sell(&self.buy_yes.member.no_token, self.buy_yes.role(), &no_bids)
            .fill(self.no_tag, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupShape, MarketIndex};
    use crate::testkit::domain::{child_above, parent_above};
    use rust_decimal_macros::dec;

    fn run(child: Quote, parent: Quote) -> Vec<Opportunity> {
        let index = MarketIndex::build(vec![parent_above("p", dec!(50)), child_above("c", "p", dec!(50))])
            .unwrap();
        let group = index
            .groups()
            .iter()
            .find(|g| matches!(g.shape(), GroupShape::SameDirectionPair { .. }))
            .unwrap();
        let GroupShape::SameDirectionPair { child: c, parent: p } = group.shape() else {
            unreachable!()
        };
        let snapshot = GroupSnapshot::new(vec![(c.yes, Some(child)), (p.yes, Some(parent))]);
        evaluate(group, c, p, &snapshot, &Sizing::default())
    }

    #[test]
    fn test_cheap_child_yes_emits_yes_side() {
        let opps = run(
            Quote::top(dec!(0.28), 10, dec!(0.30), 40, 1),
            Quote::top(dec!(0.35), 25, dec!(0.37), 10, 1),
        );

        assert_eq!(opps.len(), 1);
        let opp = &opps[0];
        assert_eq!(opp.strategy(), StrategyTag::BuyChildYesSellParentYes);
        assert_eq!(opp.size(), 25);
        assert_eq!(opp.profit(), dec!(1.25));
        assert_eq!(opp.legs()[0].token_id().as_str(), "c-yes");
        assert_eq!(opp.legs()[1].token_id().as_str(), "p-yes");
    }

    #[test]
    fn test_expensive_yes_emits_no_mirror() {
        // Buy child YES at 0.80 or parent NO at 1 - 0.85 = 0.15: NO is cheaper.
        let opps = run(
            Quote::top(dec!(0.78), 10, dec!(0.80), 10, 1),
            Quote::top(dec!(0.85), 10, dec!(0.87), 10, 1),
        );

        assert_eq!(opps.len(), 1);
        let opp = &opps[0];
        assert_eq!(opp.strategy(), StrategyTag::BuyParentNoSellChildNo);
        assert_eq!(opp.legs()[0].token_id().as_str(), "p-no");
        assert_eq!(opp.legs()[0].price(), dec!(0.15));
        assert_eq!(opp.legs()[1].token_id().as_str(), "c-no");
        assert_eq!(opp.legs()[1].price(), dec!(0.20));
        assert_eq!(opp.profit(), dec!(0.50));
    }

    #[test]
    fn test_cheap_parent_direction() {
        let opps = run(
            Quote::top(dec!(0.45), 10, dec!(0.47), 10, 1),
            Quote::top(dec!(0.38), 10, dec!(0.40), 10, 1),
        );

        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].strategy(), StrategyTag::BuyParentYesSellChildYes);
        assert_eq!(opps[0].profit(), dec!(0.50));

        let opps = run(
            Quote::top(dec!(0.75), 10, dec!(0.77), 10, 1),
            Quote::top(dec!(0.68), 10, dec!(0.70), 10, 1),
        );
        assert_eq!(opps[0].strategy(), StrategyTag::BuyChildNoSellParentNo);
    }

    #[test]
    fn test_tie_goes_to_yes_side() {
        // ask 0.45, bid 0.55: YES buy 0.45 == NO buy 1 - 0.55.
        let opps = run(
            Quote::top(dec!(0.40), 10, dec!(0.45), 10, 1),
            Quote::top(dec!(0.55), 10, dec!(0.60), 10, 1),
        );
        assert_eq!(opps[0].strategy(), StrategyTag::BuyChildYesSellParentYes);
    }

    #[test]
    fn test_aligned_prices_yield_nothing() {
        let opps = run(
            Quote::top(dec!(0.40), 10, dec!(0.42), 10, 1),
            Quote::top(dec!(0.41), 10, dec!(0.43), 10, 1),
        );
        assert!(opps.is_empty());
    }
}
