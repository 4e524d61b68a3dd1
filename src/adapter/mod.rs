//! Adapters between the engine and the outside world.
//!
//! - [`catalog`] - Market catalog files
//! - [`replay`] - Quote streams replayed from JSON lines
//! - [`executor`] - Order plan executors

pub mod catalog;
pub mod executor;
pub mod replay;

pub use catalog::{Catalog, MarketRecord};
pub use executor::{LogExecutor, PlanWriter};
pub use replay::ReplayStream;
