//! Threshold gate.

use crate::domain::Opportunity;

/// Whether an opportunity clears the minimum profit.
///
/// Compares the integer basis points computed when the opportunity was
/// built; nothing is recomputed here.
#[must_use]
pub fn passes(opportunity: &Opportunity, min_profit_bps: i64) -> bool {
    opportunity.profit_bps() >= min_profit_bps
}
