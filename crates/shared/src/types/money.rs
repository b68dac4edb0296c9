//! Rupiah helpers.
//!
//! Money is always `rust_decimal::Decimal`. Floats appear only at the JSON
//! boundary, through `rust_decimal::serde::float`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Formats an amount as whole rupiah with comma thousands separators,
/// e.g. `Rp 1,250,000`.
#[must_use]
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Decimal places of every stored money column (`NUMERIC(15,2)`).
pub const MONEY_SCALE: u32 = 2;

/// Rounds to the stored money scale, half away from zero like PostgreSQL.
#[must_use]
pub fn to_money_scale(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a JSON number or numeric string into a `Decimal` at the stored
/// money scale, so validation sees the value that will be persisted.
///
/// Returns `None` for anything else, including blank strings.
#[must_use]
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Decimal::from(i)),
            None => parse_decimal_str(&n.to_string()),
        },
        Value::String(s) => parse_decimal_str(s.trim()),
        _ => None,
    }?;
    Some(to_money_scale(raw))
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Returns the larger of `amount` and zero.
#[must_use]
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
