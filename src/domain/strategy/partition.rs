//! Partition (bundling/unbundling) arbitrage.
//!
//! When children tile a parent range exactly, parent YES pays 1.00 iff
//! exactly one child YES does, so the parent is worth the sum of its
//! children. `UNBUNDLE` sells the parent and buys the children; `BUNDLE`
//! does the reverse. Both walk the full depth of every ladder.

use super::{GroupSnapshot, MarketGroup, Opportunity, Sizing, StrategyTag, Trade};
use crate::domain::{Member, Quote};

/// Evaluate `BUNDLE` and `UNBUNDLE` for a parent tiled by two children.
#[must_use]
pub fn evaluate(
    group: &MarketGroup,
    parent: &Member,
    children: &[Member],
    snapshot: &GroupSnapshot,
    sizing: &Sizing,
) -> Vec<Opportunity> {
    bundles(
        group,
        parent,
        children,
        snapshot,
        sizing,
        (StrategyTag::Bundle, StrategyTag::Unbundle),
    )
}

/// Bundle and unbundle checks shared with combinations.
pub(crate) fn bundles(
    group: &MarketGroup,
    parent: &Member,
    children: &[Member],
    snapshot: &GroupSnapshot,
    sizing: &Sizing,
    (bundle, unbundle): (StrategyTag, StrategyTag),
) -> Vec<Opportunity> {
    let Some(parent_quote) = snapshot.get(parent.yes) else {
        return Vec::new();
    };
    let Some(child_quotes) = children
        .iter()
        .map(|c| snapshot.get(c.yes))
        .collect::<Option<Vec<&Quote>>>()
    else {
        return Vec::new();
    };

    let mut sell_parent = Trade::new(sizing).sell(&parent.yes_token, parent.role, parent_quote.bids());
    for (child, quote) in children.iter().zip(&child_quotes) {
        sell_parent = sell_parent.buy(&child.yes_token, child.role, quote.asks());
    }

    let mut buy_parent = Trade::new(sizing).buy(&parent.yes_token, parent.role, parent_quote.asks());
    for (child, quote) in children.iter().zip(&child_quotes) {
        buy_parent = buy_parent.sell(&child.yes_token, child.role, quote.bids());
    }

    sell_parent
        .fill(unbundle, group)
        .into_iter()
        .chain(buy_parent.fill(bundle, group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupShape, LegRole, MarketIndex, PriceLevel, Side};
    use crate::testkit::domain::tiled_partition;
    use rust_decimal_macros::dec;

    fn run(parent: Quote, children: [Quote; 2]) -> Vec<Opportunity> {
        let index = MarketIndex::build(tiled_partition("p", 2, 50)).unwrap();
        let group = index
            .groups()
            .iter()
            .find(|g| matches!(g.shape(), GroupShape::Partition { .. }))
            .unwrap();
        let GroupShape::Partition { parent: p, children: cs } = group.shape() else {
            unreachable!()
        };
        let mut quotes = vec![(p.yes, Some(parent))];
        quotes.extend(cs.iter().map(|c| c.yes).zip(children.into_iter().map(Some)));
        evaluate(group, p, cs, &GroupSnapshot::new(quotes), &Sizing::default())
    }

    #[test]
    fn test_unbundle_when_parent_bid_exceeds_children() {
        let opps = run(
            Quote::top(dec!(0.90), 100, dec!(0.92), 100, 1),
            [
                Quote::top(dec!(0.38), 100, dec!(0.40), 60, 1),
                Quote::top(dec!(0.43), 100, dec!(0.45), 100, 1),
            ],
        );

        assert_eq!(opps.len(), 1);
        let opp = &opps[0];
        assert_eq!(opp.strategy(), StrategyTag::Unbundle);
        assert_eq!(opp.size(), 60);
        assert_eq!(opp.proceeds(), dec!(54.00));
        assert_eq!(opp.cost(), dec!(51.00));
        assert_eq!(opp.legs().len(), 3);
        assert_eq!(opp.legs()[0].side(), Side::Sell);
        assert_eq!(opp.legs()[0].role(), LegRole::Parent);
        assert_eq!(opp.legs()[1].role(), LegRole::Child { lower: Some(dec!(0)) });
        assert_eq!(opp.legs()[2].role(), LegRole::Child { lower: Some(dec!(50)) });
    }

    #[test]
    fn test_bundle_when_parent_ask_below_children() {
        let opps = run(
            Quote::top(dec!(0.70), 100, dec!(0.75), 40, 1),
            [
                Quote::top(dec!(0.40), 100, dec!(0.42), 100, 1),
                Quote::top(dec!(0.40), 100, dec!(0.42), 100, 1),
            ],
        );

        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].strategy(), StrategyTag::Bundle);
        assert_eq!(opps[0].size(), 40);
        assert_eq!(opps[0].profit(), dec!(2.00));
    }

    #[test]
    fn test_unbundle_walks_parent_depth() {
        let parent = Quote::with_levels(
            vec![PriceLevel::new(dec!(0.90), 20), PriceLevel::new(dec!(0.86), 50)],
            vec![PriceLevel::new(dec!(0.95), 10)],
            1,
        );
        let opps = run(
            parent,
            [
                Quote::top(dec!(0.30), 10, dec!(0.40), 100, 1),
                Quote::top(dec!(0.30), 10, dec!(0.44), 100, 1),
            ],
        );

        // 20 @ +0.06, 50 @ +0.02
        assert_eq!(opps[0].size(), 70);
        assert_eq!(opps[0].profit(), dec!(2.20));
        assert_eq!(opps[0].legs()[0].price(), dec!(0.86));
    }

    #[test]
    fn test_missing_child_quote_yields_nothing() {
        let index = MarketIndex::build(tiled_partition("p", 2, 50)).unwrap();
        let group = index
            .groups()
            .iter()
            .find(|g| matches!(g.shape(), GroupShape::Partition { .. }))
            .unwrap();
        let GroupShape::Partition { parent, children } = group.shape() else {
            unreachable!()
        };
        let snapshot = GroupSnapshot::new(vec![
            (parent.yes, Some(Quote::top(dec!(0.90), 10, dec!(0.92), 10, 1))),
            (children[0].yes, Some(Quote::top(dec!(0.30), 10, dec!(0.31), 10, 1))),
        ]);
        assert!(evaluate(group, parent, children, &snapshot, &Sizing::default()).is_empty());
    }
}
