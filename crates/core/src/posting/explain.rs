//! Human-readable explanation of how a transaction's fees were filled in.

use serde::Serialize;

use super::fees::FeeBreakdown;

/// Attached to the create-transaction response as `fee_calculation`.
#[derive(Debug, Clone, Serialize)]
pub struct FeeCalculation {
    /// Where the service fee came from.
    pub service_fee_source: &'static str,
    /// Where the bank fee came from.
    pub bank_fee_source: &'static str,
    /// One line per stored field.
    pub calculation_details: CalculationDetails,
}

/// Per-field explanation lines.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationDetails {
    /// Amount line.
    pub amount: String,
    /// Service fee line.
    pub service_fee: String,
    /// Bank fee line.
    pub bank_fee: String,
    /// Extra fee line.
    pub extra_fee: String,
    /// Total received formula with its value.
    pub total_received: String,
    /// Net profit formula with its value.
    pub net_profit: String,
}

impl FeeCalculation {
    /// Describes an automatically calculated breakdown.
    #[must_use]
    pub fn describe(breakdown: &FeeBreakdown) -> Self {
        Self {
            service_fee_source: "auto-calculated",
            bank_fee_source: "auto-calculated",
            calculation_details: CalculationDetails {
                amount: "nilai final yang diterima customer (tidak dipotong)".to_string(),
                service_fee: "otomatis dari service_fees tabel (amount range)".to_string(),
                bank_fee: "otomatis dari bank_fees tabel (edc + service)".to_string(),
                extra_fee: "biaya tambahan manual (opsional)".to_string(),
                total_received: format!(
                    "amount + service_fee + bank_fee + extra_fee = {}",
                    breakdown.total_received().normalize()
                ),
                net_profit: format!("amount - extra_fee = {}", breakdown.net_profit().normalize()),
            },
        }
    }
}
