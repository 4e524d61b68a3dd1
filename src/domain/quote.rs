//! Per-token quote state.
//!
//! A [`Quote`] holds the bid and ask ladders of one outcome token, best
//! level first, plus the feed sequence number used to discard stale
//! updates. [`QuoteEvent`] is the wire form of one streaming update.
//!
//! # Examples
//!
//! ```
//! use rangearb::domain::{PriceLevel, Quote};
//! use rust_decimal_macros::dec;
//!
//! let quote = Quote::top(dec!(0.45), 100, dec!(0.47), 250, 7);
//!
//! assert_eq!(quote.best_bid().unwrap().price(), dec!(0.45));
//! assert_eq!(quote.best_ask().unwrap().size(), 250);
//! assert_eq!(quote.sequence(), 7);
//! ```

use serde::{Deserialize, Serialize};

use super::id::TokenId;
use super::index::Slot;
use super::money::{Price, Size};

/// A single price level in a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    price: Price,
    size: Size,
}

impl PriceLevel {
    /// Creates a new price level.
    #[must_use]
    pub const fn new(price: Price, size: Size) -> Self {
        Self { price, size }
    }

    /// Returns the price at this level.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the size available at this price.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }
}

/// Latest book state for one outcome token.
///
/// Bids are sorted by price descending and asks ascending, so the first
/// level of each side is the top of book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    sequence: u64,
}

impl Quote {
    /// Create a quote from full ladders.
    ///
    /// Empty levels are dropped and each side is sorted best first.
    #[must_use]
    pub fn with_levels(mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>, sequence: u64) -> Self {
        bids.retain(|l| l.size > 0);
        asks.retain(|l| l.size > 0);
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            bids,
            asks,
            sequence,
        }
    }

    /// Create a top-of-book only quote.
    #[must_use]
    pub fn top(bid: Price, bid_size: Size, ask: Price, ask_size: Size, sequence: u64) -> Self {
        Self::with_levels(
            vec![PriceLevel::new(bid, bid_size)],
            vec![PriceLevel::new(ask, ask_size)],
            sequence,
        )
    }

    /// Best (highest) bid.
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best (lowest) ask.
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// One streaming top-of-book update for a token.
///
/// `bids` and `asks` optionally carry levels beyond the best one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEvent {
    pub token_id: TokenId,
    pub best_bid: Price,
    pub best_bid_size: Size,
    pub best_ask: Price,
    pub best_ask_size: Size,
    pub sequence: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bids: Vec<PriceLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asks: Vec<PriceLevel>,
}

impl QuoteEvent {
    /// Create a top-of-book event without deeper levels.
    pub fn top(
        token_id: impl Into<TokenId>,
        best_bid: Price,
        best_bid_size: Size,
        best_ask: Price,
        best_ask_size: Size,
        sequence: u64,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            best_bid,
            best_bid_size,
            best_ask,
            best_ask_size,
            sequence,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Convert into the stored quote, merging the best level with any depth.
    #[must_use]
    pub fn into_quote(self) -> (TokenId, Quote) {
        let mut bids = Vec::with_capacity(self.bids.len() + 1);
        bids.push(PriceLevel::new(self.best_bid, self.best_bid_size));
        bids.extend(self.bids.into_iter().filter(|l| l.price < self.best_bid));

        let mut asks = Vec::with_capacity(self.asks.len() + 1);
        asks.push(PriceLevel::new(self.best_ask, self.best_ask_size));
        asks.extend(self.asks.into_iter().filter(|l| l.price > self.best_ask));

        (self.token_id, Quote::with_levels(bids, asks, self.sequence))
    }
}

/// Immutable copy of the quotes one group evaluation reads.
///
/// Taken under a single read fence, so every quote in it belongs to the
/// same instant of the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSnapshot {
    quotes: Vec<(Slot, Option<Quote>)>,
}

impl GroupSnapshot {
    /// Build a snapshot from `(slot, quote)` pairs.
    #[must_use]
    pub fn new(mut quotes: Vec<(Slot, Option<Quote>)>) -> Self {
        quotes.sort_by_key(|(slot, _)| *slot);
        Self { quotes }
    }

    /// Quote of the token in `slot`; `None` if absent or never quoted.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&Quote> {
        self.quotes
            .binary_search_by_key(&slot, |(s, _)| *s)
            .ok()
            .and_then(|i| self.quotes[i].1.as_ref())
    }

    /// Sequence of the quote in `slot`, zero if never quoted.
    #[must_use]
    pub fn sequence(&self, slot: Slot) -> u64 {
        self.get(slot).map_or(0, Quote::sequence)
    }
}
