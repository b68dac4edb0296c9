//! Posting errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a transaction cannot be posted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// EDC machine or service id missing.
    #[error("edc_machine_id dan service_id wajib diisi")]
    MissingFields,

    /// Amount or extra fee is not a number.
    #[error("Amount harus berupa angka")]
    InvalidAmount,

    /// Amount is zero or negative.
    #[error("Amount harus lebih dari 0")]
    NonPositiveAmount,

    /// Extra fee is negative.
    #[error("Extra fee tidak boleh negatif")]
    NegativeExtraFee,

    /// EDC float cannot cover a transfer.
    #[error("Saldo EDC tidak cukup. Saldo tersedia: {available}, Amount dibutuhkan: {required}")]
    InsufficientEdcBalance {
        /// Current EDC saldo.
        available: Decimal,
        /// Transaction amount.
        required: Decimal,
    },

    /// Agent cash cannot cover a withdrawal.
    #[error("Uang tunai tidak cukup. Saldo tersedia: {available}, Amount dibutuhkan: {required}")]
    InsufficientCash {
        /// Current agent balance.
        available: Decimal,
        /// Transaction amount.
        required: Decimal,
    },
}

impl PostingError {
    /// Wire error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidAmount | Self::NonPositiveAmount | Self::NegativeExtraFee => {
                "INVALID_INPUT"
            }
            Self::InsufficientEdcBalance { .. } | Self::InsufficientCash { .. } => {
                "INSUFFICIENT_BALANCE"
            }
        }
    }
}
