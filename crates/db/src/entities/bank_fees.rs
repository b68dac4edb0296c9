//! `SeaORM` Entity for bank_fees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub edc_machine_id: i64,
    pub service_id: i64,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub fee: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::edc_machines::Entity",
        from = "Column::EdcMachineId",
        to = "super::edc_machines::Column::Id",
        on_delete = "Cascade"
    )]
    EdcMachines,
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id",
        on_delete = "Cascade"
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
