//! `SeaORM` Entity for service_fees table.

use brilink_core::posting::FeeBracket;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub service_id: i64,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub min_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub max_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub fee: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id",
        on_delete = "Cascade"
    )]
    Services,
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for FeeBracket {
    fn from(m: &Model) -> Self {
        Self {
            min_amount: m.min_amount,
            max_amount: m.max_amount,
            fee: m.fee,
        }
    }
}
