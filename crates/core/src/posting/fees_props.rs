//! Property-based tests for fee bracket resolution and derived totals.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::fees::{FeeBracket, FeeBreakdown, resolve_bracket_fee};

/// Strategy to generate a non-negative amount with two decimals.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a bracket with `min <= max`.
fn bracket() -> impl Strategy<Value = FeeBracket> {
    (amount(), amount(), amount()).prop_map(|(a, b, fee)| FeeBracket {
        min_amount: a.min(b),
        max_amount: a.max(b),
        fee,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The resolved fee is zero or the fee of the first bracket containing the amount.
    #[test]
    fn prop_fee_is_zero_or_first_match(
        brackets in prop::collection::vec(bracket(), 0..8),
        value in amount(),
    ) {
        let fee = resolve_bracket_fee(&brackets, value);
        match brackets.iter().find(|b| b.contains(value)) {
            Some(first) => prop_assert_eq!(fee, first.fee),
            None => prop_assert_eq!(fee, Decimal::ZERO),
        }
    }

    /// An amount outside every bracket always resolves to zero.
    #[test]
    fn prop_above_all_brackets_is_zero(brackets in prop::collection::vec(bracket(), 0..8)) {
        let above = brackets
            .iter()
            .map(|b| b.max_amount)
            .max()
            .unwrap_or(Decimal::ZERO)
            + Decimal::ONE;
        prop_assert_eq!(resolve_bracket_fee(&brackets, above), Decimal::ZERO);
    }

    /// Total received is the sum of the four fields; net profit adds back to the amount.
    #[test]
    fn prop_totals_identities(
        value in amount(),
        service_fee in amount(),
        bank_fee in amount(),
        extra_fee in amount(),
    ) {
        let b = FeeBreakdown::new(value, service_fee, bank_fee, extra_fee);
        prop_assert_eq!(b.total_received(), value + service_fee + bank_fee + extra_fee);
        prop_assert_eq!(b.net_profit() + extra_fee, value);
        prop_assert_eq!(b.total_received() - b.total_fees(), value);
    }
}
