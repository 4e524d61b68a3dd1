//! Opportunity type with builder pattern.
//!
//! An [`Opportunity`] is a candidate trade derived from one market group.
//! Use [`Opportunity::builder`] to construct one; the builder computes the
//! profit and the integer basis points once, and every later consumer
//! (threshold gate, plan builder) reads those stored values.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{GroupId, TokenId};
use super::money::{basis_points, Price, Size};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Enumerated opportunity shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyTag {
    BuyYesBuyNo,
    SellYesSellNo,
    BuyChildYesSellParentNo,
    BuyParentNoSellChildYes,
    BuyChildYesSellParentYes,
    BuyParentNoSellChildNo,
    BuyParentYesSellChildYes,
    BuyChildNoSellParentNo,
    Bundle,
    Unbundle,
    ComboBundle,
    ComboUnbundle,
    BuyCover,
    SellCover,
}

impl StrategyTag {
    /// Wire name of the tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BuyYesBuyNo => "BUY_YES_BUY_NO",
            Self::SellYesSellNo => "SELL_YES_SELL_NO",
            Self::BuyChildYesSellParentNo => "BUY_CHILD_YES_SELL_PARENT_NO",
            Self::BuyParentNoSellChildYes => "BUY_PARENT_NO_SELL_CHILD_YES",
            Self::BuyChildYesSellParentYes => "BUY_CHILD_YES_SELL_PARENT_YES",
            Self::BuyParentNoSellChildNo => "BUY_PARENT_NO_SELL_CHILD_NO",
            Self::BuyParentYesSellChildYes => "BUY_PARENT_YES_SELL_CHILD_YES",
            Self::BuyChildNoSellParentNo => "BUY_CHILD_NO_SELL_PARENT_NO",
            Self::Bundle => "BUNDLE",
            Self::Unbundle => "UNBUNDLE",
            Self::ComboBundle => "COMBO_BUNDLE",
            Self::ComboUnbundle => "COMBO_UNBUNDLE",
            Self::BuyCover => "BUY_COVER",
            Self::SellCover => "SELL_COVER",
        }
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a leg's market within its group.
///
/// Children order by the lower bound of their range; an unbounded lower
/// bound sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LegRole {
    Parent,
    Child { lower: Option<Decimal> },
}

/// One leg of an opportunity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    token_id: TokenId,
    side: Side,
    price: Price,
    size: Size,
    role: LegRole,
}

impl Leg {
    #[must_use]
    pub const fn new(token_id: TokenId, side: Side, price: Price, size: Size, role: LegRole) -> Self {
        Self {
            token_id,
            side,
            price,
            size,
            role,
        }
    }

    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Limit price of the leg (worst level consumed).
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn role(&self) -> LegRole {
        self.role
    }
}

/// Key identifying repeated firings of the same opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    group_id: GroupId,
    strategy: StrategyTag,
}

impl ThrottleKey {
    #[must_use]
    pub const fn new(group_id: GroupId, strategy: StrategyTag) -> Self {
        Self { group_id, strategy }
    }

    #[must_use]
    pub const fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    #[must_use]
    pub const fn strategy(&self) -> StrategyTag {
        self.strategy
    }
}

impl fmt::Display for ThrottleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.strategy)
    }
}

/// Error returned when building an Opportunity fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityBuildError {
    /// Strategy tag is required but was not provided.
    MissingStrategy,
    /// Group ID is required but was not provided.
    MissingGroup,
    /// At least one leg is required.
    EmptyLegs,
    /// Size must be positive.
    ZeroSize,
    /// Cost must be positive for basis points to be defined.
    NonPositiveCost,
}

impl fmt::Display for OpportunityBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStrategy => write!(f, "strategy is required"),
            Self::MissingGroup => write!(f, "group_id is required"),
            Self::EmptyLegs => write!(f, "at least one leg is required"),
            Self::ZeroSize => write!(f, "size must be positive"),
            Self::NonPositiveCost => write!(f, "cost must be positive"),
        }
    }
}

impl std::error::Error for OpportunityBuildError {}

/// A computed candidate trade.
///
/// Created fresh on every recomputation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opportunity {
    strategy: StrategyTag,
    group_id: GroupId,
    legs: Vec<Leg>,
    size: Size,
    cost: Price,
    proceeds: Price,
    profit: Price,
    profit_bps: i64,
}

impl Opportunity {
    /// Create a new builder for constructing an Opportunity.
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::default()
    }

    #[must_use]
    pub const fn strategy(&self) -> StrategyTag {
        self.strategy
    }

    #[must_use]
    pub const fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    /// Legs in evaluator order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Number of units traded on every leg.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Total outlay, including split collateral where the shape needs it.
    #[must_use]
    pub const fn cost(&self) -> Price {
        self.cost
    }

    /// Total proceeds, including guaranteed payouts.
    #[must_use]
    pub const fn proceeds(&self) -> Price {
        self.proceeds
    }

    /// Expected absolute profit (`proceeds - cost`).
    #[must_use]
    pub const fn profit(&self) -> Price {
        self.profit
    }

    /// Profit in basis points of cost, rounded down.
    #[must_use]
    pub const fn profit_bps(&self) -> i64 {
        self.profit_bps
    }

    #[must_use]
    pub fn throttle_key(&self) -> ThrottleKey {
        ThrottleKey::new(self.group_id.clone(), self.strategy)
    }
}

/// Builder for constructing `Opportunity` instances.
///
/// # Example
///
/// ```ignore
/// let opportunity = Opportunity::builder()
///     .strategy(StrategyTag::Unbundle)
///     .group_id(group.id().clone())
///     .legs(legs)
///     .size(fill.size)
///     .cost(fill.cost)
///     .proceeds(fill.proceeds)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    strategy: Option<StrategyTag>,
    group_id: Option<GroupId>,
    legs: Vec<Leg>,
    size: Size,
    cost: Price,
    proceeds: Price,
}

impl OpportunityBuilder {
    pub fn strategy(mut self, strategy: StrategyTag) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn group_id(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn leg(mut self, leg: Leg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn legs(mut self, legs: impl IntoIterator<Item = Leg>) -> Self {
        self.legs.extend(legs);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn cost(mut self, cost: Price) -> Self {
        self.cost = cost;
        self
    }

    pub fn proceeds(mut self, proceeds: Price) -> Self {
        self.proceeds = proceeds;
        self
    }

    /// Build the Opportunity, calculating profit and basis points.
    ///
    /// # Errors
    ///
    /// Returns `OpportunityBuildError` if a required field is missing or the
    /// cost is not positive.
    pub fn build(self) -> Result<Opportunity, OpportunityBuildError> {
        let strategy = self.strategy.ok_or(OpportunityBuildError::MissingStrategy)?;
        let group_id = self.group_id.ok_or(OpportunityBuildError::MissingGroup)?;
        if self.legs.is_empty() {
            return Err(OpportunityBuildError::EmptyLegs);
        }
        if self.size == 0 {
            return Err(OpportunityBuildError::ZeroSize);
        }

        let profit = self.proceeds - self.cost;
        let profit_bps =
            basis_points(profit, self.cost).ok_or(OpportunityBuildError::NonPositiveCost)?;

        Ok(Opportunity {
            strategy,
            group_id,
            legs: self.legs,
            size: self.size,
            cost: self.cost,
            proceeds: self.proceeds,
            profit,
            profit_bps,
        })
    }
}
