//! Response shapes for entities.
//!
//! Money leaves the service as JSON numbers; everything before this point is
//! `Decimal`.

use brilink_db::entities::{
    agent_profiles, bank_fees, cash_flows, edc_machines, service_fees, services, transactions,
    users,
};
use brilink_db::repositories::TransactionRefs;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Agent profile.
#[derive(Debug, Clone, Serialize)]
pub struct AgentView {
    pub id: i64,
    pub user_id: i64,
    pub owner_id: Option<i64>,
    pub agent_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,
    pub logo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<&agent_profiles::Model> for AgentView {
    fn from(m: &agent_profiles::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            owner_id: m.owner_id,
            agent_name: m.agent_name.clone(),
            address: m.address.clone(),
            phone: m.phone.clone(),
            total_balance: m.total_balance,
            logo: m.logo.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Agent summary attached to a user in the user list.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: i64,
    pub agent_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,
}

impl From<&agent_profiles::Model> for AgentSummary {
    fn from(m: &agent_profiles::Model) -> Self {
        Self {
            id: m.id,
            agent_name: m.agent_name.clone(),
            address: m.address.clone(),
            phone: m.phone.clone(),
            total_balance: m.total_balance,
        }
    }
}

/// User with its optional agent summary.
#[derive(Debug, Clone, Serialize)]
pub struct UserListItem {
    #[serde(flatten)]
    pub user: users::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_profile: Option<AgentSummary>,
}

/// EDC machine.
#[derive(Debug, Clone, Serialize)]
pub struct EdcMachineView {
    pub id: i64,
    pub agent_profile_id: Option<i64>,
    pub name: String,
    pub bank_name: String,
    pub account_number: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo: Decimal,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<&edc_machines::Model> for EdcMachineView {
    fn from(m: &edc_machines::Model) -> Self {
        Self {
            id: m.id,
            agent_profile_id: m.agent_profile_id,
            name: m.name.clone(),
            bank_name: m.bank_name.clone(),
            account_number: m.account_number.clone(),
            saldo: m.saldo,
            status: m.status.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Service fee bracket.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceFeeView {
    pub id: i64,
    pub service_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<&service_fees::Model> for ServiceFeeView {
    fn from(m: &service_fees::Model) -> Self {
        Self {
            id: m.id,
            service_id: m.service_id,
            min_amount: m.min_amount,
            max_amount: m.max_amount,
            fee: m.fee,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Service with its fee brackets.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: services::Model,
    pub fees: Vec<ServiceFeeView>,
}

/// Bank fee.
#[derive(Debug, Clone, Serialize)]
pub struct BankFeeView {
    pub id: i64,
    pub edc_machine_id: i64,
    pub service_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<&bank_fees::Model> for BankFeeView {
    fn from(m: &bank_fees::Model) -> Self {
        Self {
            id: m.id,
            edc_machine_id: m.edc_machine_id,
            service_id: m.service_id,
            fee: m.fee,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Cash-flow entry.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowView {
    pub id: i64,
    pub agent_profile_id: Option<i64>,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub flow_type: String,
    pub source: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<&cash_flows::Model> for CashFlowView {
    fn from(m: &cash_flows::Model) -> Self {
        Self {
            id: m.id,
            agent_profile_id: m.agent_profile_id,
            user_id: m.user_id,
            flow_type: m.flow_type.clone(),
            source: m.source.clone(),
            amount: m.amount,
            description: m.description.clone(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Transaction with the derived `total_received`.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: i64,
    pub transaction_number: String,
    pub edc_machine_id: i64,
    pub service_id: i64,
    pub agent_profile_id: Option<i64>,
    pub user_id: i64,
    pub cashier_name: Option<String>,
    pub customer_name: Option<String>,
    pub target_number: Option<String>,
    pub reference_number: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub bank_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub extra_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_received: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_profit: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<&transactions::Model> for TransactionView {
    fn from(m: &transactions::Model) -> Self {
        Self {
            id: m.id,
            transaction_number: m.transaction_number.clone(),
            edc_machine_id: m.edc_machine_id,
            service_id: m.service_id,
            agent_profile_id: m.agent_profile_id,
            user_id: m.user_id,
            cashier_name: m.cashier_name.clone(),
            customer_name: m.customer_name.clone(),
            target_number: m.target_number.clone(),
            reference_number: m.reference_number.clone(),
            amount: m.amount,
            service_fee: m.service_fee,
            bank_fee: m.bank_fee,
            extra_fee: m.extra_fee,
            total_received: m.total_received(),
            net_profit: m.net_profit,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Name-only reference to a related row.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// Transaction with summaries of the rows it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithRefs {
    #[serde(flatten)]
    pub transaction: TransactionView,
    pub service: Option<NamedRef>,
    pub edc_machine: Option<NamedRef>,
    pub agent_profile: Option<NamedRef>,
    pub user: Option<NamedRef>,
}

impl TransactionWithRefs {
    /// Joins `rows` with the loaded references, keeping order.
    pub fn build(rows: &[transactions::Model], refs: &TransactionRefs) -> Vec<Self> {
        rows.iter()
            .map(|t| Self {
                transaction: t.into(),
                service: refs.services.get(&t.service_id).map(|s| NamedRef {
                    id: s.id,
                    name: s.name.clone(),
                }),
                edc_machine: refs.edc_machines.get(&t.edc_machine_id).map(|m| NamedRef {
                    id: m.id,
                    name: m.name.clone(),
                }),
                agent_profile: t
                    .agent_profile_id
                    .and_then(|id| refs.agents.get(&id))
                    .map(|a| NamedRef {
                        id: a.id,
                        name: a.agent_name.clone(),
                    }),
                user: refs.users.get(&t.user_id).map(|u| NamedRef {
                    id: u.id,
                    name: u.name.clone(),
                }),
            })
            .collect()
    }
}

/// Converts a slice of models into views.
pub fn views<'a, M: 'a, V>(rows: &'a [M]) -> Vec<V>
where
    V: From<&'a M>,
{
    rows.iter().map(V::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal_macros::dec;

    fn ts() -> DateTimeWithTimeZone {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 5, 9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_transaction_view_money_is_numeric() {
        let model = transactions::Model {
            id: 1,
            transaction_number: "TRX-ABCDEF123456".into(),
            edc_machine_id: 2,
            service_id: 3,
            agent_profile_id: None,
            user_id: 4,
            cashier_name: Some("Budi".into()),
            customer_name: None,
            target_number: None,
            reference_number: None,
            amount: dec!(100000.00),
            service_fee: dec!(2500.00),
            bank_fee: dec!(1000.00),
            extra_fee: dec!(500.00),
            net_profit: dec!(99500.00),
            created_at: ts(),
            updated_at: ts(),
        };
        let json = serde_json::to_value(TransactionView::from(&model)).unwrap();
        assert_eq!(json["amount"], serde_json::json!(100_000.0));
        assert_eq!(json["total_received"], serde_json::json!(104_000.0));
        assert_eq!(json["created_at"], "2026-01-05T09:30:00+07:00");
    }

    #[test]
    fn test_cash_flow_view_renames_type() {
        let model = cash_flows::Model {
            id: 1,
            agent_profile_id: Some(2),
            user_id: 3,
            flow_type: "cash_in".into(),
            source: "Modal".into(),
            amount: dec!(50000),
            description: None,
            created_at: ts(),
            updated_at: ts(),
        };
        let json = serde_json::to_value(CashFlowView::from(&model)).unwrap();
        assert_eq!(json["type"], "cash_in");
        assert_eq!(json["amount"], serde_json::json!(50_000.0));
    }
}
