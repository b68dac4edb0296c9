//! Fee brackets and the amounts derived from them.

use rust_decimal::Decimal;
use serde::Serialize;

/// A service fee that applies when `min_amount <= amount <= max_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBracket {
    /// Inclusive lower bound.
    pub min_amount: Decimal,
    /// Inclusive upper bound.
    pub max_amount: Decimal,
    /// Fee charged inside the bracket.
    pub fee: Decimal,
}

impl FeeBracket {
    /// Returns true if `amount` falls inside the bracket.
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        self.min_amount <= amount && amount <= self.max_amount
    }
}

/// Returns the fee of the first bracket containing `amount`, or zero.
///
/// `brackets` must already be in resolution order (ascending id).
#[must_use]
pub fn resolve_bracket_fee(brackets: &[FeeBracket], amount: Decimal) -> Decimal {
    brackets
        .iter()
        .find(|b| b.contains(amount))
        .map_or(Decimal::ZERO, |b| b.fee)
}

/// The stored money fields of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    /// Amount the customer receives or sends.
    pub amount: Decimal,
    /// Bracket fee for the service.
    pub service_fee: Decimal,
    /// Flat fee for the (machine, service) pair.
    pub bank_fee: Decimal,
    /// Manual surcharge.
    pub extra_fee: Decimal,
}

impl FeeBreakdown {
    /// Creates a breakdown.
    #[must_use]
    pub const fn new(
        amount: Decimal,
        service_fee: Decimal,
        bank_fee: Decimal,
        extra_fee: Decimal,
    ) -> Self {
        Self {
            amount,
            service_fee,
            bank_fee,
            extra_fee,
        }
    }

    /// Everything collected from the customer.
    #[must_use]
    pub fn total_received(&self) -> Decimal {
        self.amount + self.service_fee + self.bank_fee + self.extra_fee
    }

    /// `amount - extra_fee`.
    #[must_use]
    pub fn net_profit(&self) -> Decimal {
        self.amount - self.extra_fee
    }

    /// Sum of the three fees.
    #[must_use]
    pub fn total_fees(&self) -> Decimal {
        self.service_fee + self.bank_fee + self.extra_fee
    }
}
