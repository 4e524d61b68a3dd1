//! Opportunity evaluators.
//!
//! One evaluator per [`GroupShape`]; [`evaluate`] dispatches with an
//! exhaustive match, so a new shape cannot be added without an evaluator.
//! Evaluators are pure functions of a group and a [`GroupSnapshot`]: they
//! never touch the live quote book.
//!
//! - [`binary`] - YES and NO of one market
//! - [`complement`] - child `< X` against parent `> X`
//! - [`same_direction`] - child `> X` against parent `> X`
//! - [`partition`] - parent tiled by two children
//! - [`combination`] - parent tiled by more than two children, plus the cover cycle
//! - [`depth`] - lockstep prefix aggregation shared by all of the above

pub mod binary;
pub mod combination;
pub mod complement;
pub mod depth;
pub mod partition;
pub mod same_direction;

pub use depth::{fill_basket, Basket, BasketFill};

use super::{
    GroupShape, GroupSnapshot, Leg, LegRole, MarketGroup, Opportunity, Price, PriceLevel, Side,
    StrategyTag, TokenId,
};

/// Sizing limits applied to every evaluator.
#[derive(Debug, Clone, Default)]
pub struct Sizing {
    /// Cap on the cost of one opportunity; unlimited when absent.
    pub max_cost: Option<Price>,
}

/// Evaluate every opportunity shape the group supports against a snapshot.
#[must_use]
pub fn evaluate(group: &MarketGroup, snapshot: &GroupSnapshot, sizing: &Sizing) -> Vec<Opportunity> {
    match group.shape() {
        GroupShape::BinaryPair { market } => binary::evaluate(group, market, snapshot, sizing),
        GroupShape::ComplementPair { child, parent } => {
            complement::evaluate(group, child, parent, snapshot, sizing)
        }
        GroupShape::SameDirectionPair { child, parent } => {
            same_direction::evaluate(group, child, parent, snapshot, sizing)
        }
        GroupShape::Partition { parent, children } => {
            partition::evaluate(group, parent, children, snapshot, sizing)
        }
        GroupShape::Combination { parent, children } => {
            combination::evaluate(group, parent, children, snapshot, sizing)
        }
    }
}

/// A basket together with the tokens its legs trade.
///
/// Legs are recorded in the order they are added, which is the order the
/// resulting opportunity lists them in.
pub(crate) struct Trade<'a> {
    basket: Basket<'a>,
    legs: Vec<(Side, &'a TokenId, LegRole)>,
}

impl<'a> Trade<'a> {
    pub(crate) fn new(sizing: &Sizing) -> Self {
        Self {
            basket: Basket::new().max_cost(sizing.max_cost),
            legs: Vec::new(),
        }
    }

    pub(crate) fn buy(mut self, token: &'a TokenId, role: LegRole, asks: &'a [PriceLevel]) -> Self {
        self.basket = self.basket.buy(asks);
        self.legs.push((Side::Buy, token, role));
        self
    }

    pub(crate) fn sell(mut self, token: &'a TokenId, role: LegRole, bids: &'a [PriceLevel]) -> Self {
        self.basket = self.basket.sell(bids);
        self.legs.push((Side::Sell, token, role));
        self
    }

    /// Every unit pays out exactly 1.00 at resolution.
    pub(crate) fn payout(mut self) -> Self {
        self.basket = self.basket.fixed_proceeds(super::money::PAYOUT);
        self
    }

    /// Every unit is minted from 1.00 of split collateral.
    pub(crate) fn collateral(mut self) -> Self {
        self.basket = self.basket.fixed_cost(super::money::PAYOUT);
        self
    }

    /// Size the trade and build the opportunity, if it has a positive edge.
    pub(crate) fn fill(self, strategy: StrategyTag, group: &MarketGroup) -> Option<Opportunity> {
        let fill = fill_basket(&self.basket)?;

        let mut buy_limits = fill.buy_limits.iter();
        let mut sell_limits = fill.sell_limits.iter();
        let legs = self
            .legs
            .into_iter()
            .map(|(side, token, role)| {
                let limit = match side {
                    Side::Buy => buy_limits.next(),
                    Side::Sell => sell_limits.next(),
                }?;
                Some(Leg::new(token.clone(), side, *limit, fill.size, role))
            })
            .collect::<Option<Vec<_>>>()?;

        Opportunity::builder()
            .strategy(strategy)
            .group_id(group.id().clone())
            .legs(legs)
            .size(fill.size)
            .cost(fill.cost)
            .proceeds(fill.proceeds)
            .build()
            .ok()
    }
}

/// Single-level ladder holding the top of a side, if present.
pub(crate) fn top(level: Option<&PriceLevel>) -> Vec<PriceLevel> {
    level.copied().into_iter().collect()
}

/// Single-level ladder at the NO-side price implied by a YES level.
pub(crate) fn mirrored(level: Option<&PriceLevel>) -> Vec<PriceLevel> {
    level
        .map(|l| PriceLevel::new(super::money::complement(l.price()), l.size()))
        .into_iter()
        .collect()
}
