use rangearb::domain::{OrderPlan, Side, StrategyTag, TokenId};
use rust_decimal::Decimal;

/// Assert the plan's orders as `(token, side, limit price, size)` tuples, in order.
pub fn assert_orders(plan: &OrderPlan, expected: &[(&str, Side, Decimal, u64)]) {
    let actual: Vec<(TokenId, Side, Decimal, u64)> = plan
        .orders
        .iter()
        .map(|o| (o.token_id.clone(), o.side, o.limit_price, o.size))
        .collect();
    let expected: Vec<(TokenId, Side, Decimal, u64)> = expected
        .iter()
        .map(|(t, s, p, n)| (TokenId::from(*t), *s, *p, *n))
        .collect();
    assert_eq!(actual, expected, "orders of {} plan differ", plan.strategy);
}

/// Strategy tags of the given plans, in order.
pub fn strategies(plans: &[OrderPlan]) -> Vec<StrategyTag> {
    plans.iter().map(|p| p.strategy).collect()
}
