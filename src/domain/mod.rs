//! Exchange-agnostic domain types.
//!
//! - [`id`] - Identifier newtypes
//! - [`money`] - Exact price arithmetic and basis points
//! - [`market`] - Markets and outcome ranges
//! - [`quote`] - Per-token quote ladders and stream events
//! - [`index`] - Market structure index and group shapes
//! - [`opportunity`] - Candidate trades
//! - [`plan`] - Exchange-ready order plans
//! - [`strategy`] - Opportunity evaluators per group shape

pub mod id;
pub mod index;
pub mod market;
pub mod money;
pub mod opportunity;
pub mod plan;
pub mod quote;
pub mod strategy;

pub use id::{ConditionId, GroupId, TokenId};
pub use index::{GroupCensus, GroupShape, MarketGroup, MarketIndex, Member, Slot};
pub use market::{Market, MarketKind, OutcomeRange};
pub use money::{basis_points, Price, Size};
pub use opportunity::{
    Leg, LegRole, Opportunity, OpportunityBuildError, OpportunityBuilder, Side, StrategyTag,
    ThrottleKey,
};
pub use plan::{Order, OrderPlan};
pub use quote::{GroupSnapshot, PriceLevel, Quote, QuoteEvent};
