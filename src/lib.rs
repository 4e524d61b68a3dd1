//! Rangearb - Arbitrage decisions for related range prediction markets.
//!
//! Markets on one underlying quantity ("above 50", "below 50", "between 40
//! and 60") carry logical dependencies: complements sum to one, containment
//! orders prices, a tiling of children prices the same as their parent. This
//! crate indexes those relations once from a catalog, keeps a top-of-book
//! cache per token, and on every market update evaluates only the groups
//! that read the updated token. Profitable, non-throttled opportunities
//! become exchange-ready order plans.
//!
//! # Modules
//!
//! - [`domain`] - Markets, quotes, group shapes, opportunities and evaluators
//! - [`engine`] - Quote book, profit gate, throttle and plan builder
//! - [`runtime`] - Async loop over a quote stream with plan dispatch
//! - [`adapter`] - Catalog files, replayed quote streams, executors
//! - [`config`] - TOML configuration with environment overrides
//! - [`cli`] - Command handlers for the `rangearb` binary
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Expose test builders and mocks to integration tests
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! use rangearb::config::EngineConfig;
//! use rangearb::domain::{
//!     ConditionId, Market, MarketIndex, OrderPlan, OutcomeRange, QuoteEvent, TokenId,
//! };
//! use rangearb::engine::Engine;
//! use rust_decimal_macros::dec;
//! use tokio::sync::mpsc;
//!
//! let markets = vec![
//!     Market::range_parent(
//!         ConditionId::from("p"),
//!         "Above 50?",
//!         TokenId::from("p-yes"),
//!         TokenId::from("p-no"),
//!         OutcomeRange::at_or_above(dec!(50)),
//!     ),
//!     Market::range_child(
//!         ConditionId::from("c"),
//!         "Below 50?",
//!         TokenId::from("c-yes"),
//!         TokenId::from("c-no"),
//!         OutcomeRange::below(dec!(50)),
//!         ConditionId::from("p"),
//!     ),
//! ];
//! let index = MarketIndex::build(markets).unwrap();
//! let (tx, mut rx) = mpsc::unbounded_channel::<OrderPlan>();
//! let engine = Engine::new(index, &EngineConfig::default(), Arc::new(tx));
//!
//! let now = Instant::now();
//! engine.on_quote(QuoteEvent::top("p-yes", dec!(0.54), 100, dec!(0.55), 120, 1), now).unwrap();
//! engine.on_quote(QuoteEvent::top("c-yes", dec!(0.38), 100, dec!(0.40), 70, 1), now).unwrap();
//!
//! let plan = rx.try_recv().unwrap();
//! assert_eq!(plan.orders.len(), 2);
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod runtime;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
