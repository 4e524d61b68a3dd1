//! Depth/prefix aggregation across multi-leg baskets.
//!
//! A basket buys one unit on every buy leg and sells one unit on every sell
//! leg, plus optional fixed per-unit terms (the 1.00 payout of a complete
//! set, or the 1.00 collateral of a split). [`fill_basket`] walks all
//! ladders in lockstep: each chunk is as large as the thinnest remaining
//! level, its per-unit edge is the signed sum of the current level prices,
//! and cost and proceeds accumulate as prefix sums. Ladders are sorted best
//! first, so chunk edges never increase and the walk stops at the largest
//! profitable prefix.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::money::{is_tradeable, size_value};
use crate::domain::{Price, PriceLevel, Size};

/// Legs and per-unit terms of one multi-leg trade.
#[derive(Debug, Clone, Default)]
pub struct Basket<'a> {
    buys: Vec<&'a [PriceLevel]>,
    sells: Vec<&'a [PriceLevel]>,
    fixed_cost: Price,
    fixed_proceeds: Price,
    max_cost: Option<Price>,
}

impl<'a> Basket<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leg bought on an ask ladder.
    #[must_use]
    pub fn buy(mut self, asks: &'a [PriceLevel]) -> Self {
        self.buys.push(asks);
        self
    }

    /// Add a leg sold on a bid ladder.
    #[must_use]
    pub fn sell(mut self, bids: &'a [PriceLevel]) -> Self {
        self.sells.push(bids);
        self
    }

    /// Per-unit cost paid outside the ladders, e.g. split collateral.
    #[must_use]
    pub fn fixed_cost(mut self, cost: Price) -> Self {
        self.fixed_cost = cost;
        self
    }

    /// Per-unit proceeds received outside the ladders, e.g. a guaranteed payout.
    #[must_use]
    pub fn fixed_proceeds(mut self, proceeds: Price) -> Self {
        self.fixed_proceeds = proceeds;
        self
    }

    /// Cap on cumulative cost.
    #[must_use]
    pub fn max_cost(mut self, budget: Option<Price>) -> Self {
        self.max_cost = budget;
        self
    }
}

/// Result of filling a basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketFill {
    /// Units executed on every leg.
    pub size: Size,
    /// Cumulative cost (buy legs plus fixed cost).
    pub cost: Price,
    /// Cumulative proceeds (sell legs plus fixed proceeds).
    pub proceeds: Price,
    /// Worst price touched on each buy leg, in basket order.
    pub buy_limits: Vec<Price>,
    /// Worst price touched on each sell leg, in basket order.
    pub sell_limits: Vec<Price>,
}

impl BasketFill {
    #[must_use]
    pub fn profit(&self) -> Price {
        self.proceeds - self.cost
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    level: usize,
    used: Size,
}

impl Cursor {
    fn current(self, ladder: &[PriceLevel]) -> Option<(Price, Size)> {
        let level = ladder.get(self.level)?;
        if !is_tradeable(level.price()) || level.size() <= self.used {
            return None;
        }
        Some((level.price(), level.size() - self.used))
    }

    fn advance(&mut self, ladder: &[PriceLevel], by: Size) {
        self.used += by;
        if ladder.get(self.level).is_some_and(|l| self.used >= l.size()) {
            self.level += 1;
            self.used = 0;
        }
    }
}

/// Largest profitable prefix of the basket.
///
/// Returns `None` when no unit can be executed at a positive edge. The size
/// never exceeds the total depth of the thinnest leg.
#[must_use]
pub fn fill_basket(basket: &Basket<'_>) -> Option<BasketFill> {
    if basket.buys.is_empty() && basket.sells.is_empty() {
        return None;
    }

    let mut buy_cursors = vec![Cursor::default(); basket.buys.len()];
    let mut sell_cursors = vec![Cursor::default(); basket.sells.len()];
    let mut buy_limits = vec![Decimal::ZERO; basket.buys.len()];
    let mut sell_limits = vec![Decimal::ZERO; basket.sells.len()];

    let mut size: Size = 0;
    let mut cost = Decimal::ZERO;
    let mut proceeds = Decimal::ZERO;

    'walk: loop {
        let mut chunk = Size::MAX;
        let mut unit_cost = basket.fixed_cost;
        let mut unit_proceeds = basket.fixed_proceeds;

        for (cursor, ladder) in buy_cursors.iter().zip(&basket.buys) {
            let Some((price, available)) = cursor.current(ladder) else {
                break 'walk;
            };
            chunk = chunk.min(available);
            unit_cost += price;
        }
        for (cursor, ladder) in sell_cursors.iter().zip(&basket.sells) {
            let Some((price, available)) = cursor.current(ladder) else {
                break 'walk;
            };
            chunk = chunk.min(available);
            unit_proceeds += price;
        }

        if unit_proceeds <= unit_cost {
            break;
        }

        if let Some(budget) = basket.max_cost {
            let room = budget - cost;
            if room <= Decimal::ZERO {
                break;
            }
            if unit_cost > Decimal::ZERO {
                // A room wider than u64 units leaves the ladders as the only limit.
                let affordable = room
                    .checked_div(unit_cost)
                    .and_then(|units| units.floor().to_u64())
                    .unwrap_or(Size::MAX);
                chunk = chunk.min(affordable);
            }
        }
        if chunk == 0 {
            break;
        }
        let Some(next_size) = size.checked_add(chunk) else {
            break;
        };

        for ((cursor, ladder), limit) in buy_cursors.iter_mut().zip(&basket.buys).zip(&mut buy_limits) {
            if let Some((price, _)) = cursor.current(ladder) {
                *limit = price;
            }
            cursor.advance(ladder, chunk);
        }
        for ((cursor, ladder), limit) in sell_cursors.iter_mut().zip(&basket.sells).zip(&mut sell_limits) {
            if let Some((price, _)) = cursor.current(ladder) {
                *limit = price;
            }
            cursor.advance(ladder, chunk);
        }

        size = next_size;
        cost += unit_cost * size_value(chunk);
        proceeds += unit_proceeds * size_value(chunk);
    }

    (size > 0).then_some(BasketFill {
        size,
        cost,
        proceeds,
        buy_limits,
        sell_limits,
    })
}
