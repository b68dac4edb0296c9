//! `SeaORM` Entity for transactions table.

use brilink_core::posting::FeeBreakdown;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub transaction_number: String,
    pub edc_machine_id: i64,
    pub service_id: i64,
    pub agent_profile_id: Option<i64>,
    pub user_id: i64,
    pub cashier_name: Option<String>,
    pub customer_name: Option<String>,
    pub target_number: Option<String>,
    pub reference_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub service_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub bank_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub extra_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub net_profit: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::edc_machines::Entity",
        from = "Column::EdcMachineId",
        to = "super::edc_machines::Column::Id"
    )]
    EdcMachines,
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id"
    )]
    Services,
}

impl Related<super::edc_machines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EdcMachines.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Fee figures of this row.
    pub const fn fees(&self) -> FeeBreakdown {
        FeeBreakdown::new(self.amount, self.service_fee, self.bank_fee, self.extra_fee)
    }

    /// `amount + service_fee + bank_fee + extra_fee`. Never stored.
    pub fn total_received(&self) -> Decimal {
        self.fees().total_received()
    }
}
