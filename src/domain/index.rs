//! Market structure index.
//!
//! Derives the arbitrage groups of a catalog and indexes them by the tokens
//! their evaluators read. The index is built once and consulted read-only;
//! a catalog change builds a fresh index rather than patching this one.
//!
//! Group derivation, for each range parent and the children that name it:
//!
//! - every market forms a [`GroupShape::BinaryPair`]
//! - a child `[-inf, X)` under a parent `[X, +inf)` forms a complement pair
//! - a child with the same range as the parent forms a same-direction pair
//! - the remaining children must tile the parent range exactly and form a
//!   partition (two children) or a combination (more than two)
//! - a lone narrower child, e.g. "> 60" under "> 50", joins no range group

use std::cmp::Ordering;
use std::collections::HashMap;

use super::id::{ConditionId, GroupId, TokenId};
use super::market::{Market, MarketKind, OutcomeRange};
use tracing::warn;

use super::opportunity::LegRole;
use crate::error::EngineError;

/// Position of a token in the quote arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(usize);

impl Slot {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A market as seen from inside a group: its tokens and their arena slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub condition_id: ConditionId,
    pub yes_token: TokenId,
    pub no_token: TokenId,
    pub yes: Slot,
    pub no: Slot,
    pub role: LegRole,
}

/// Closed set of arbitrage shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupShape {
    /// YES and NO of a single market.
    BinaryPair { market: Member },
    /// Child `< X` against parent `> X`.
    ComplementPair { child: Member, parent: Member },
    /// Child `> X` against parent `> X`.
    SameDirectionPair { child: Member, parent: Member },
    /// Parent tiled by exactly two children.
    Partition { parent: Member, children: Vec<Member> },
    /// Parent tiled by more than two children.
    Combination { parent: Member, children: Vec<Member> },
}

impl GroupShape {
    /// Short name used in group ids and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BinaryPair { .. } => "binary",
            Self::ComplementPair { .. } => "complement",
            Self::SameDirectionPair { .. } => "same_direction",
            Self::Partition { .. } => "partition",
            Self::Combination { .. } => "combination",
        }
    }

    /// Arena slots the evaluator for this shape reads, ascending.
    fn reads(&self) -> Vec<Slot> {
        let mut slots = match self {
            Self::BinaryPair { market } => vec![market.yes, market.no],
            Self::ComplementPair { child, parent } | Self::SameDirectionPair { child, parent } => {
                vec![child.yes, parent.yes]
            }
            Self::Partition { parent, children } => std::iter::once(parent.yes)
                .chain(children.iter().map(|c| c.yes))
                .collect(),
            Self::Combination { parent, children } => [parent.yes, parent.no]
                .into_iter()
                .chain(children.iter().map(|c| c.yes))
                .collect(),
        };
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    fn members(&self) -> Vec<&Member> {
        match self {
            Self::BinaryPair { market } => vec![market],
            Self::ComplementPair { child, parent } | Self::SameDirectionPair { child, parent } => {
                vec![child, parent]
            }
            Self::Partition { parent, children } | Self::Combination { parent, children } => {
                std::iter::once(parent).chain(children.iter()).collect()
            }
        }
    }
}

/// A set of markets related by one arbitrage shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketGroup {
    id: GroupId,
    shape: GroupShape,
    reads: Vec<Slot>,
}

impl MarketGroup {
    fn new(shape: GroupShape) -> Self {
        let id = GroupId::derive(shape.name(), shape.members().into_iter().map(|m| &m.condition_id));
        let reads = shape.reads();
        Self { id, shape, reads }
    }

    #[must_use]
    pub const fn id(&self) -> &GroupId {
        &self.id
    }

    #[must_use]
    pub const fn shape(&self) -> &GroupShape {
        &self.shape
    }

    /// Arena slots read during evaluation, ascending.
    #[must_use]
    pub fn reads(&self) -> &[Slot] {
        &self.reads
    }
}

/// Per-shape group counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupCensus {
    pub binary: usize,
    pub complement: usize,
    pub same_direction: usize,
    pub partition: usize,
    pub combination: usize,
}

/// Index of markets, tokens and groups.
#[derive(Debug, Default)]
pub struct MarketIndex {
    markets: Vec<Market>,
    by_condition: HashMap<ConditionId, usize>,
    tokens: Vec<TokenId>,
    slots: HashMap<TokenId, Slot>,
    groups: Vec<MarketGroup>,
    token_groups: Vec<Vec<usize>>,
}

impl MarketIndex {
    /// Build the index from a catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns `MalformedGroup` when the catalog violates a structural
    /// invariant (duplicate ids, misclassified markets, children that do not
    /// tile their parent) and `UnknownMarket` when a child names a parent
    /// that is not in the catalog.
    pub fn build(markets: Vec<Market>) -> Result<Self, EngineError> {
        let mut index = Self::default();

        for market in &markets {
            index.register(market)?;
        }
        index.markets = markets;

        let mut groups: Vec<MarketGroup> = index
            .markets
            .iter()
            .map(|m| {
                MarketGroup::new(GroupShape::BinaryPair {
                    market: index.member(m, LegRole::Parent),
                })
            })
            .collect();

        for (parent_idx, children) in index.children_by_parent()? {
            groups.extend(index.range_groups(parent_idx, &children)?);
        }

        index.token_groups = vec![Vec::new(); index.tokens.len()];
        for (group_idx, group) in groups.iter().enumerate() {
            for slot in group.reads() {
                index.token_groups[slot.index()].push(group_idx);
            }
        }
        index.groups = groups;

        Ok(index)
    }

    fn register(&mut self, market: &Market) -> Result<(), EngineError> {
        let id = market.condition_id();
        match market.kind() {
            MarketKind::RangeParent if market.range().is_none() => {
                return Err(EngineError::malformed(id, "range parent has no range"));
            }
            MarketKind::RangeChild if market.range().is_none() || market.parent().is_none() => {
                return Err(EngineError::malformed(id, "range child needs a range and a parent"));
            }
            _ => {}
        }
        if market.yes_token() == market.no_token() {
            return Err(EngineError::malformed(id, "YES and NO tokens are identical"));
        }

        let position = self.by_condition.len();
        if self.by_condition.insert(id.clone(), position).is_some() {
            return Err(EngineError::malformed(id, "duplicate condition id"));
        }
        for token in [market.yes_token(), market.no_token()] {
            let slot = Slot(self.tokens.len());
            if self.slots.insert(token.clone(), slot).is_some() {
                return Err(EngineError::malformed(id, format!("duplicate token {token}")));
            }
            self.tokens.push(token.clone());
        }
        Ok(())
    }

    /// Children grouped by parent, both in catalog order.
    fn children_by_parent(&self) -> Result<Vec<(usize, Vec<usize>)>, EngineError> {
        let mut grouped: Vec<(usize, Vec<usize>)> = Vec::new();
        for (child_idx, child) in self.markets.iter().enumerate() {
            let Some(parent_id) = child.parent() else {
                continue;
            };
            let parent_idx = *self
                .by_condition
                .get(parent_id)
                .ok_or_else(|| EngineError::unknown(parent_id))?;
            if self.markets[parent_idx].kind() != MarketKind::RangeParent {
                return Err(EngineError::malformed(
                    parent_id,
                    format!("{} names a parent that is not a range parent", child.condition_id()),
                ));
            }
            match grouped.iter_mut().find(|(p, _)| *p == parent_idx) {
                Some((_, children)) => children.push(child_idx),
                None => grouped.push((parent_idx, vec![child_idx])),
            }
        }
        grouped.sort_by_key(|(p, _)| *p);
        Ok(grouped)
    }

    fn range_groups(&self, parent_idx: usize, children: &[usize]) -> Result<Vec<MarketGroup>, EngineError> {
        let parent = &self.markets[parent_idx];
        let parent_id = parent.condition_id();
        let parent_range = *parent
            .range()
            .ok_or_else(|| EngineError::malformed(parent_id, "range parent has no range"))?;

        let mut groups = Vec::new();
        let mut tiles: Vec<(&Market, OutcomeRange)> = Vec::new();

        for &child_idx in children {
            let child = &self.markets[child_idx];
            let range = *child.range().ok_or_else(|| {
                EngineError::malformed(parent_id, format!("child {} has no range", child.condition_id()))
            })?;

            if range.complements(&parent_range) {
                groups.push(MarketGroup::new(GroupShape::ComplementPair {
                    child: self.member(child, LegRole::Child { lower: range.lower() }),
                    parent: self.member(parent, LegRole::Parent),
                }));
            } else if range == parent_range {
                groups.push(MarketGroup::new(GroupShape::SameDirectionPair {
                    child: self.member(child, LegRole::Child { lower: range.lower() }),
                    parent: self.member(parent, LegRole::Parent),
                }));
            } else if parent_range.contains(&range) {
                tiles.push((child, range));
            } else {
                return Err(EngineError::malformed(
                    parent_id,
                    format!(
                        "child {} range {range} lies outside parent range {parent_range}",
                        child.condition_id()
                    ),
                ));
            }
        }

        if let [(child, range)] = tiles.as_slice() {
            warn!(
                parent = %parent_id,
                child = %child.condition_id(),
                range = %range,
                "Nested child has no siblings to tile its parent, leaving it ungrouped"
            );
            return Ok(groups);
        }
        if tiles.is_empty() {
            return Ok(groups);
        }

        tiles.sort_by(|a, b| a.1.lower().cmp(&b.1.lower()));
        check_tiling(parent_id, &parent_range, &tiles)?;

        let parent_member = self.member(parent, LegRole::Parent);
        let children: Vec<Member> = tiles
            .iter()
            .map(|(m, r)| self.member(m, LegRole::Child { lower: r.lower() }))
            .collect();
        let shape = if children.len() == 2 {
            GroupShape::Partition {
                parent: parent_member,
                children,
            }
        } else {
            GroupShape::Combination {
                parent: parent_member,
                children,
            }
        };
        groups.push(MarketGroup::new(shape));
        Ok(groups)
    }

    fn member(&self, market: &Market, role: LegRole) -> Member {
        Member {
            condition_id: market.condition_id().clone(),
            yes_token: market.yes_token().clone(),
            no_token: market.no_token().clone(),
            yes: self.slots[market.yes_token()],
            no: self.slots[market.no_token()],
            role,
        }
    }

    /// Groups whose evaluation reads `token`.
    pub fn groups_containing<'a>(&'a self, token: &TokenId) -> impl Iterator<Item = &'a MarketGroup> + 'a {
        let indices: &[usize] = self
            .slots
            .get(token)
            .map(|slot| self.token_groups[slot.index()].as_slice())
            .unwrap_or(&[]);
        indices.iter().map(move |&i| &self.groups[i])
    }

    /// Group indices affected by a change to the token in `slot`.
    #[must_use]
    pub fn groups_for_slot(&self, slot: Slot) -> &[usize] {
        self.token_groups
            .get(slot.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a market by condition id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMarket` if the condition id is not in the catalog.
    pub fn resolve(&self, condition_id: &ConditionId) -> Result<&Market, EngineError> {
        self.by_condition
            .get(condition_id)
            .map(|&i| &self.markets[i])
            .ok_or_else(|| EngineError::unknown(condition_id))
    }

    /// Arena slot of a token.
    #[must_use]
    pub fn slot(&self, token: &TokenId) -> Option<Slot> {
        self.slots.get(token).copied()
    }

    /// Token stored in a slot.
    #[must_use]
    pub fn token(&self, slot: Slot) -> &TokenId {
        &self.tokens[slot.index()]
    }

    #[must_use]
    pub fn group(&self, index: usize) -> &MarketGroup {
        &self.groups[index]
    }

    #[must_use]
    pub fn groups(&self) -> &[MarketGroup] {
        &self.groups
    }

    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Number of modeled tokens (arena size).
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn census(&self) -> GroupCensus {
        let mut census = GroupCensus::default();
        for group in &self.groups {
            match group.shape() {
                GroupShape::BinaryPair { .. } => census.binary += 1,
                GroupShape::ComplementPair { .. } => census.complement += 1,
                GroupShape::SameDirectionPair { .. } => census.same_direction += 1,
                GroupShape::Partition { .. } => census.partition += 1,
                GroupShape::Combination { .. } => census.combination += 1,
            }
        }
        census
    }
}

/// Children sorted by lower bound must cover the parent range exactly once.
fn check_tiling(
    parent_id: &ConditionId,
    parent_range: &OutcomeRange,
    tiles: &[(&Market, OutcomeRange)],
) -> Result<(), EngineError> {
    let mut covered_to = parent_range.lower();
    let mut first = true;
    for (market, range) in tiles {
        if !first && covered_to.is_none() {
            return Err(EngineError::malformed(
                parent_id,
                format!("child {} overlaps an unbounded sibling", market.condition_id()),
            ));
        }
        if range.lower() != covered_to {
            let problem = match range.lower().cmp(&covered_to) {
                Ordering::Greater => "gap before",
                _ => "overlap at",
            };
            return Err(EngineError::malformed(
                parent_id,
                format!("{problem} child {} range {range}", market.condition_id()),
            ));
        }
        covered_to = range.upper();
        first = false;
    }

    if covered_to != parent_range.upper() {
        return Err(EngineError::malformed(
            parent_id,
            format!("children stop short of parent range {parent_range}"),
        ));
    }
    Ok(())
}
