//! Monetary types for price and size representation.
//!
//! Prices are exact decimals in `[0, 1]`; sizes are whole base units. Profit
//! ratios are expressed in basis points computed with integer arithmetic so
//! that the evaluator and the threshold gate can never disagree on a
//! borderline value.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Size in exchange base units.
pub type Size = u64;

/// Payout of one winning share.
pub const PAYOUT: Price = Decimal::ONE;

/// Basis points in one unit.
const BPS_PER_UNIT: i128 = 10_000;

/// Convert a size to a decimal for price arithmetic.
#[must_use]
pub fn size_value(size: Size) -> Decimal {
    Decimal::from(size)
}

/// Price of the opposite outcome of a binary market (`1 - price`).
#[must_use]
pub fn complement(price: Price) -> Price {
    PAYOUT - price
}

/// Whether a price is strictly inside `(0, 1)` and therefore tradeable.
#[must_use]
pub fn is_tradeable(price: Price) -> bool {
    price > Decimal::ZERO && price < PAYOUT
}

/// Profit in basis points of cost, rounded down.
///
/// Computes `floor(profit * 10_000 / cost)` exactly: both operands are
/// rescaled to a common decimal scale and divided as integers. Returns
/// `None` for a non-positive cost or when the rescaled values do not fit.
#[must_use]
pub fn basis_points(profit: Decimal, cost: Decimal) -> Option<i64> {
    if cost <= Decimal::ZERO {
        return None;
    }

    let scale = profit.scale().max(cost.scale());
    let profit = rescaled_mantissa(profit, scale)?;
    let cost = rescaled_mantissa(cost, scale)?;

    let bps = profit.checked_mul(BPS_PER_UNIT)?.div_euclid(cost);
    i64::try_from(bps).ok()
}

fn rescaled_mantissa(value: Decimal, scale: u32) -> Option<i128> {
    let factor = 10i128.checked_pow(scale - value.scale())?;
    value.mantissa().checked_mul(factor)
}
