//! Thread-safe top-of-book cache.
//!
//! Quotes live in an arena indexed by token [`Slot`], one lock per slot, so
//! updates to different tokens never contend. Group evaluation copies the
//! quotes it needs under a read fence over all member slots.

use parking_lot::RwLock;

use crate::domain::{GroupSnapshot, MarketIndex, Quote, Slot, TokenId};
use crate::error::EngineError;

/// Result of storing a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied<'a> {
    /// Slot the quote was stored in.
    pub slot: Slot,
    /// Sequence now stored in the slot.
    pub sequence: u64,
    /// Indices of the groups whose evaluation reads the slot.
    pub groups: &'a [usize],
}

/// Arena of per-token quotes.
pub struct QuoteBook {
    slots: Vec<RwLock<Option<Quote>>>,
}

impl QuoteBook {
    /// Create an empty book with one slot per token of the index.
    #[must_use]
    pub fn new(index: &MarketIndex) -> Self {
        Self::with_slots(index.token_count())
    }

    /// Create an empty book with `len` slots.
    #[must_use]
    pub fn with_slots(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| RwLock::new(None)).collect(),
        }
    }

    /// Store a quote for the token.
    ///
    /// Holds only the token's own slot lock, and only for the compare and
    /// swap.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMarket` if the token is not in the index, and
    /// `StaleUpdate` if the stored quote already has an equal or newer
    /// sequence. Either way the book is unchanged.
    pub fn apply<'i>(
        &self,
        index: &'i MarketIndex,
        token: &TokenId,
        quote: Quote,
    ) -> Result<Applied<'i>, EngineError> {
        let slot = index.slot(token).ok_or_else(|| EngineError::unknown(token))?;
        let cell = self.cell(slot).ok_or_else(|| EngineError::unknown(token))?;

        let mut stored = cell.write();
        if let Some(current) = stored.as_ref() {
            if quote.sequence() <= current.sequence() {
                return Err(EngineError::StaleUpdate {
                    token_id: token.clone(),
                    stored: current.sequence(),
                    received: quote.sequence(),
                });
            }
        }
        let sequence = quote.sequence();
        *stored = Some(quote);
        drop(stored);

        Ok(Applied {
            slot,
            sequence,
            groups: index.groups_for_slot(slot),
        })
    }

    /// Copy the quotes in `slots` under one read fence.
    ///
    /// Locks are taken in ascending slot order and all held until every
    /// quote is copied. Writers hold a single slot lock at a time, so the
    /// fence cannot deadlock against them.
    #[must_use]
    pub fn snapshot(&self, slots: &[Slot]) -> GroupSnapshot {
        let mut ordered = slots.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let guards: Vec<_> = ordered
            .iter()
            .filter_map(|&slot| self.cell(slot).map(|cell| (slot, cell.read())))
            .collect();
        let quotes = guards.iter().map(|(slot, guard)| (*slot, (**guard).clone())).collect();
        drop(guards);

        GroupSnapshot::new(quotes)
    }

    /// Copy of the quote in a slot.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<Quote> {
        self.cell(slot)?.read().clone()
    }

    /// Sequence stored in a slot, zero if never quoted.
    #[must_use]
    pub fn sequence(&self, slot: Slot) -> u64 {
        self.cell(slot)
            .and_then(|cell| cell.read().as_ref().map(Quote::sequence))
            .unwrap_or(0)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding a quote.
    #[must_use]
    pub fn quoted(&self) -> usize {
        self.slots.iter().filter(|cell| cell.read().is_some()).count()
    }

    fn cell(&self, slot: Slot) -> Option<&RwLock<Option<Quote>>> {
        self.slots.get(slot.index())
    }
}
