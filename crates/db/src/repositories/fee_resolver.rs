//! Fee lookups for posting.
//!
//! Lookups never fail the caller: a missing row or a database error both
//! resolve to a zero fee, and errors are logged.

use brilink_core::posting::{FeeBracket, resolve_bracket_fee};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::warn;

use super::{BankFeeRepository, ServiceFeeRepository};

/// Resolves the service and bank fee of a posting.
#[derive(Debug, Clone)]
pub struct FeeResolver {
    service_fees: ServiceFeeRepository,
    bank_fees: BankFeeRepository,
}

impl FeeResolver {
    /// Creates a new fee resolver.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            service_fees: ServiceFeeRepository::new(db.clone()),
            bank_fees: BankFeeRepository::new(db),
        }
    }

    /// Fee of the first bracket (by ascending ID) of `service_id` containing
    /// `amount`, or zero.
    pub async fn service_fee(&self, service_id: i64, amount: Decimal) -> Decimal {
        match self.service_fees.list(Some(service_id)).await {
            Ok(rows) => {
                let brackets: Vec<FeeBracket> = rows.iter().map(FeeBracket::from).collect();
                resolve_bracket_fee(&brackets, amount)
            }
            Err(e) => {
                warn!(service_id, %amount, error = %e, "Service fee lookup failed, using 0");
                Decimal::ZERO
            }
        }
    }

    /// Flat bank fee of the (EDC machine, service) pair, or zero.
    pub async fn bank_fee(&self, edc_machine_id: i64, service_id: i64) -> Decimal {
        match self.bank_fees.find_pair(edc_machine_id, service_id).await {
            Ok(row) => row.map_or(Decimal::ZERO, |r| r.fee),
            Err(e) => {
                warn!(edc_machine_id, service_id, error = %e, "Bank fee lookup failed, using 0");
                Decimal::ZERO
            }
        }
    }
}
