//! Report and dashboard queries.
//!
//! Rows are fetched here and flattened into [`TransactionFact`]s; grouping and
//! summing happen in `brilink_core::reports`.

use brilink_core::reports::{DateRange, TransactionFact, local_date};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr};

use super::{TransactionRefs, TransactionRepository};
use crate::entities::transactions;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    transactions: TransactionRepository,
    tz: Tz,
}

/// Flattens transactions with their referenced rows.
pub fn to_facts(rows: &[transactions::Model], refs: &TransactionRefs, tz: Tz) -> Vec<TransactionFact> {
    rows.iter()
        .map(|t| {
            let service = refs.services.get(&t.service_id);
            let edc = refs.edc_machines.get(&t.edc_machine_id);
            let agent = t.agent_profile_id.and_then(|id| refs.agents.get(&id));
            TransactionFact {
                service_id: t.service_id,
                service_name: service.map_or_else(|| "Unknown".to_string(), |s| s.name.clone()),
                service_category: service.and_then(|s| s.category.clone()),
                edc_machine_id: t.edc_machine_id,
                edc_name: edc.map_or_else(|| "Unknown".to_string(), |m| m.name.clone()),
                agent_profile_id: t.agent_profile_id,
                agent_name: agent.map(|a| a.agent_name.clone()),
                date: local_date(t.created_at.with_timezone(&chrono::Utc), tz),
                amount: t.amount,
                service_fee: t.service_fee,
                bank_fee: t.bank_fee,
                extra_fee: t.extra_fee,
                net_profit: t.net_profit,
            }
        })
        .collect()
}

impl ReportRepository {
    /// Creates a new report repository evaluating dates in `tz`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, tz: Tz) -> Self {
        Self {
            transactions: TransactionRepository::new(db),
            tz,
        }
    }

    /// Transactions of a local date range, flattened for aggregation.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn facts(
        &self,
        range: &DateRange,
        agent_id: Option<i64>,
    ) -> Result<Vec<TransactionFact>, DbErr> {
        let (start, end) = range.utc_bounds(self.tz);
        let rows = self.transactions.between(start, end, agent_id).await?;
        let refs = self.transactions.load_refs(&rows).await?;
        Ok(to_facts(&rows, &refs, self.tz))
    }

    /// Amount of Transfer-category transactions in a local date range.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn transfer_total(
        &self,
        range: &DateRange,
        agent_id: Option<i64>,
    ) -> Result<Decimal, DbErr> {
        let facts = self.facts(range, agent_id).await?;
        Ok(transfer_sum(&facts))
    }
}

/// Sum of amounts whose service resolves to the Transfer category.
pub fn transfer_sum(facts: &[TransactionFact]) -> Decimal {
    facts
        .iter()
        .filter(|f| {
            brilink_core::posting::ServiceCategory::parse(f.service_category.as_deref())
                .is_transfer()
        })
        .map(|f| f.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn fact(category: Option<&str>, amount: Decimal) -> TransactionFact {
        TransactionFact {
            service_id: 1,
            service_name: "S".into(),
            service_category: category.map(String::from),
            edc_machine_id: 1,
            edc_name: "EDC".into(),
            agent_profile_id: None,
            agent_name: None,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            amount,
            service_fee: Decimal::ZERO,
            bank_fee: Decimal::ZERO,
            extra_fee: Decimal::ZERO,
            net_profit: amount,
        }
    }

    #[test]
    fn test_transfer_sum_uses_category() {
        let facts = vec![
            fact(Some("Transfer"), dec!(100000)),
            fact(Some("transfer antar bank"), dec!(50000)),
            fact(Some("Tarik Tunai"), dec!(70000)),
            fact(None, dec!(10000)),
        ];
        assert_eq!(transfer_sum(&facts), dec!(150000));
    }
}
