//! Market-related domain types.
//!
//! - [`Market`] - An exchange-tradable YES/NO pair
//! - [`MarketKind`] - Plain binary, range child or range parent
//! - [`OutcomeRange`] - The half-open interval a range market resolves YES on

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ConditionId, TokenId};

/// Classification of a market within its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    /// A standalone YES/NO question.
    PlainBinary,
    /// A narrower range market related to a parent.
    RangeChild,
    /// A broader range market other markets are related to.
    RangeParent,
}

/// Half-open interval `[lower, upper)` over the underlying numeric outcome.
///
/// A missing bound is unbounded, so `"< X"` is `[-inf, X)` and `"> X"` is
/// `[X, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeRange {
    lower: Option<Decimal>,
    upper: Option<Decimal>,
}

impl OutcomeRange {
    /// Create a range; returns `None` unless `lower < upper` when both are set.
    #[must_use]
    pub fn new(lower: Option<Decimal>, upper: Option<Decimal>) -> Option<Self> {
        match (lower, upper) {
            (Some(l), Some(u)) if l >= u => None,
            _ => Some(Self { lower, upper }),
        }
    }

    /// `[-inf, x)`.
    #[must_use]
    pub const fn below(x: Decimal) -> Self {
        Self {
            lower: None,
            upper: Some(x),
        }
    }

    /// `[x, +inf)`.
    #[must_use]
    pub const fn at_or_above(x: Decimal) -> Self {
        Self {
            lower: Some(x),
            upper: None,
        }
    }

    /// Inclusive lower bound, `None` when unbounded below.
    #[must_use]
    pub const fn lower(&self) -> Option<Decimal> {
        self.lower
    }

    /// Exclusive upper bound, `None` when unbounded above.
    #[must_use]
    pub const fn upper(&self) -> Option<Decimal> {
        self.upper
    }

    /// Whether this range is the complement of `other` on the real line.
    #[must_use]
    pub fn complements(&self, other: &Self) -> bool {
        match (self.lower, self.upper, other.lower, other.upper) {
            (None, Some(u), Some(l), None) | (Some(l), None, None, Some(u)) => u == l,
            _ => false,
        }
    }

    /// Whether `other` lies entirely inside this range.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        let lower_ok = match (self.lower, other.lower) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => a <= b,
        };
        let upper_ok = match (self.upper, other.upper) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => b <= a,
        };
        lower_ok && upper_ok
    }
}

impl fmt::Display for OutcomeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(l), Some(u)) => write!(f, "[{l}, {u})"),
            (Some(l), None) => write!(f, "[{l}, +inf)"),
            (None, Some(u)) => write!(f, "[-inf, {u})"),
            (None, None) => write!(f, "(-inf, +inf)"),
        }
    }
}

/// An exchange-tradable binary outcome pair.
///
/// Immutable once constructed from catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    condition_id: ConditionId,
    question: String,
    yes_token: TokenId,
    no_token: TokenId,
    kind: MarketKind,
    range: Option<OutcomeRange>,
    parent: Option<ConditionId>,
}

impl Market {
    /// Create a plain binary market.
    pub fn binary(
        condition_id: ConditionId,
        question: impl Into<String>,
        yes_token: TokenId,
        no_token: TokenId,
    ) -> Self {
        Self {
            condition_id,
            question: question.into(),
            yes_token,
            no_token,
            kind: MarketKind::PlainBinary,
            range: None,
            parent: None,
        }
    }

    /// Create a range parent market.
    pub fn range_parent(
        condition_id: ConditionId,
        question: impl Into<String>,
        yes_token: TokenId,
        no_token: TokenId,
        range: OutcomeRange,
    ) -> Self {
        Self {
            condition_id,
            question: question.into(),
            yes_token,
            no_token,
            kind: MarketKind::RangeParent,
            range: Some(range),
            parent: None,
        }
    }

    /// Create a range child market related to `parent`.
    pub fn range_child(
        condition_id: ConditionId,
        question: impl Into<String>,
        yes_token: TokenId,
        no_token: TokenId,
        range: OutcomeRange,
        parent: ConditionId,
    ) -> Self {
        Self {
            condition_id,
            question: question.into(),
            yes_token,
            no_token,
            kind: MarketKind::RangeChild,
            range: Some(range),
            parent: Some(parent),
        }
    }

    /// Assemble a market from raw parts, as read from a catalog record.
    pub(crate) fn from_parts(
        condition_id: ConditionId,
        question: String,
        yes_token: TokenId,
        no_token: TokenId,
        kind: MarketKind,
        range: Option<OutcomeRange>,
        parent: Option<ConditionId>,
    ) -> Self {
        Self {
            condition_id,
            question,
            yes_token,
            no_token,
            kind,
            range,
            parent,
        }
    }

    #[must_use]
    pub const fn condition_id(&self) -> &ConditionId {
        &self.condition_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub const fn yes_token(&self) -> &TokenId {
        &self.yes_token
    }

    #[must_use]
    pub const fn no_token(&self) -> &TokenId {
        &self.no_token
    }

    #[must_use]
    pub const fn kind(&self) -> MarketKind {
        self.kind
    }

    /// Outcome range, set for range markets.
    #[must_use]
    pub const fn range(&self) -> Option<&OutcomeRange> {
        self.range.as_ref()
    }

    /// Condition id of the parent, set for range children.
    #[must_use]
    pub const fn parent(&self) -> Option<&ConditionId> {
        self.parent.as_ref()
    }

    /// Lower threshold of the range, used to order children.
    #[must_use]
    pub fn threshold(&self) -> Option<Decimal> {
        self.range.and_then(|r| r.lower().or(r.upper()))
    }
}
